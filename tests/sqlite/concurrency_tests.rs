//! Concurrent moves against a file-backed [`SqliteBoardStore`].

use crate::sqlite::helpers::{TempDatabase, open_store};
use crate::test_helpers::{ensure_dense, placements, seed};
use buildit_board::board::services::{BoardService, MoveTaskRequest};
use rstest::rstest;
use std::sync::Arc;

const TASKS: &[&str] = &["t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7"];

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_moves_keep_stages_dense() -> Result<(), eyre::Report> {
    let database = TempDatabase::new();
    let service = Arc::new(BoardService::new(open_store(&database.config(4)).await?));
    let board = seed(&service, &[("Doing", TASKS), ("Done", &[])]).await?;
    let done = board.stage("Done")?;

    let mut handles = Vec::with_capacity(TASKS.len());
    let mut to_done = true;
    for name in TASKS {
        let task_id = board.task(name)?;
        let worker = Arc::clone(&service);
        let request = if to_done {
            MoveTaskRequest::new(task_id).to_stage(done)
        } else {
            MoveTaskRequest::new(task_id).to_position(0)
        };
        to_done = !to_done;
        handles.push(tokio::spawn(async move { worker.move_task(request).await }));
    }
    for handle in handles {
        handle.await??;
    }

    ensure_dense(&service).await?;
    let board_after = placements(&service).await?;
    eyre::ensure!(board_after.len() == TASKS.len(), "no task may be lost");
    eyre::ensure!(
        board_after.values().filter(|task| task.stage_id() == done).count() == 4,
        "half of the tasks should have moved"
    );
    Ok(())
}

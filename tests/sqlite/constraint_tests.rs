//! Constraint and corruption handling in [`SqliteBoardStore`].

use crate::sqlite::helpers::{execute_sql, memory_store};
use crate::test_helpers::{seed, snapshot};
use buildit_board::board::{
    domain::{DensityViolation, Position},
    ports::BoardStoreError,
    services::{BoardError, BoardErrorKind, BoardService},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_stage_name_is_a_conflict() -> Result<(), eyre::Report> {
    let service = BoardService::new(memory_store().await?);
    service.create_stage("Backlog").await?;

    let err = service
        .create_stage("Backlog")
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("duplicate stage should fail"))?;

    eyre::ensure!(
        matches!(&err, BoardError::Store(BoardStoreError::DuplicateStageName(name)) if name.as_str() == "Backlog"),
        "unexpected error: {err:?}"
    );
    eyre::ensure!(err.kind() == BoardErrorKind::Conflict, "kind should be conflict");
    eyre::ensure!(
        service.list_stages().await?.len() == 1,
        "failed insert should not add a stage"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn schema_initialization_is_idempotent() -> Result<(), eyre::Report> {
    let store = memory_store().await?;
    store.initialize_schema().await?;

    let service = BoardService::new(store);
    seed(&service, &[("Backlog", &["a"])]).await?;
    eyre::ensure!(snapshot(&service).await?.len() == 1, "board should be usable");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn density_check_reports_gaps() -> Result<(), eyre::Report> {
    let store = memory_store().await?;
    let service = BoardService::new(store.clone());
    let board = seed(&service, &[("Backlog", &["a", "b", "c"])]).await?;
    let backlog = board.stage("Backlog")?;
    service.verify_density().await?;

    execute_sql(&store, "UPDATE task SET position = 5 WHERE name = 'b';").await?;

    let result = service.verify_density().await;
    eyre::ensure!(
        matches!(
            &result,
            Err(BoardError::CorruptOrdering { stage_id, violation: DensityViolation::Gap(gap) })
                if *stage_id == backlog && *gap == Position::FIRST.next()
        ),
        "expected a gap at 1, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn corrupt_rows_surface_as_internal_errors() -> Result<(), eyre::Report> {
    let store = memory_store().await?;
    let service = BoardService::new(store.clone());
    let board = seed(&service, &[("Backlog", &["a"])]).await?;

    execute_sql(&store, "UPDATE task SET name = '   ';").await?;

    let err = service
        .find_task(board.task("a")?)
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("blank persisted name should be rejected"))?;
    eyre::ensure!(err.kind() == BoardErrorKind::Internal, "unexpected kind for {err:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn negative_positions_are_refused_by_the_schema() -> Result<(), eyre::Report> {
    let store = memory_store().await?;
    let service = BoardService::new(store.clone());
    seed(&service, &[("Backlog", &["a"])]).await?;

    let result = execute_sql(&store, "UPDATE task SET position = -1;").await;
    eyre::ensure!(result.is_err(), "check constraint should reject negative positions");
    Ok(())
}

//! Board scenarios against [`InMemoryBoardStore`].

use crate::in_memory::helpers::store;
use crate::test_helpers::scenarios;
use buildit_board::board::adapters::memory::InMemoryBoardStore;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_stage_reorder(store: Arc<InMemoryBoardStore>) -> Result<(), eyre::Report> {
    scenarios::same_stage_reorder(store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_stage_move_later(store: Arc<InMemoryBoardStore>) -> Result<(), eyre::Report> {
    scenarios::same_stage_move_later(store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cross_stage_move(store: Arc<InMemoryBoardStore>) -> Result<(), eyre::Report> {
    scenarios::cross_stage_move(store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rename_only_patch(store: Arc<InMemoryBoardStore>) -> Result<(), eyre::Report> {
    scenarios::rename_only_patch(store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_of_missing_task(store: Arc<InMemoryBoardStore>) -> Result<(), eyre::Report> {
    scenarios::move_of_missing_task(store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn self_position_move(store: Arc<InMemoryBoardStore>) -> Result<(), eyre::Report> {
    scenarios::self_position_move(store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn round_trip(store: Arc<InMemoryBoardStore>) -> Result<(), eyre::Report> {
    scenarios::round_trip(store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conservation(store: Arc<InMemoryBoardStore>) -> Result<(), eyre::Report> {
    scenarios::conservation(store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_compacts(store: Arc<InMemoryBoardStore>) -> Result<(), eyre::Report> {
    scenarios::delete_compacts(store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_transaction_rolls_back(
    store: Arc<InMemoryBoardStore>,
) -> Result<(), eyre::Report> {
    scenarios::failed_transaction_rolls_back(store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_stage_is_rejected(store: Arc<InMemoryBoardStore>) -> Result<(), eyre::Report> {
    scenarios::unknown_stage_is_rejected(store).await
}

//! Opening [`SqliteBoardStore`] from environment configuration.

use crate::sqlite::helpers::{StoreEnv, TempDatabase, open_store};
use crate::test_helpers::{expected, seed, snapshot};
use buildit_board::board::{
    adapters::sqlite::{SqliteBoardStore, StoreConfig, StoreConfigError},
    services::BoardService,
};
use rstest::rstest;
use std::time::Duration;

#[rstest]
fn environment_overrides_defaults() -> Result<(), eyre::Report> {
    let database = TempDatabase::new();
    let path = database.path();
    let _guard = StoreEnv::default()
        .database_path(&path)
        .max_connections("2")
        .busy_timeout_ms("1500")
        .apply();

    let config = StoreConfig::from_env()?;

    eyre::ensure!(config.database_path == path, "path should come from env");
    eyre::ensure!(config.pool_size() == 2, "pool size should come from env");
    eyre::ensure!(
        config.busy_timeout == Duration::from_millis(1500),
        "busy timeout should come from env"
    );
    Ok(())
}

#[rstest]
fn malformed_environment_is_rejected() {
    let _guard = StoreEnv::default().max_connections("0").apply();

    assert_eq!(StoreConfig::from_env(), Err(StoreConfigError::ZeroConnections));
}

#[rstest]
fn in_memory_connection_is_never_recycled() -> Result<(), eyre::Report> {
    let store = SqliteBoardStore::connect(&StoreConfig::in_memory())?;

    eyre::ensure!(store.pool().max_size() == 1, "one connection owns the database");
    eyre::ensure!(
        store.pool().idle_timeout().is_none(),
        "idle reaping would drop the database"
    );
    eyre::ensure!(
        store.pool().max_lifetime().is_none(),
        "lifetime expiry would drop the database"
    );
    Ok(())
}

#[rstest]
fn file_database_pool_keeps_recycling() -> Result<(), eyre::Report> {
    let database = TempDatabase::new();
    let store = SqliteBoardStore::connect(&database.config(2))?;

    eyre::ensure!(store.pool().idle_timeout().is_some(), "idle connections are reaped");
    eyre::ensure!(store.pool().max_lifetime().is_some(), "connections are renewed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn file_database_persists_across_stores() -> Result<(), eyre::Report> {
    let database = TempDatabase::new();
    let layout: &[(&str, &[&str])] = &[("Backlog", &["a", "b"]), ("Done", &[])];

    {
        let service = BoardService::new(open_store(&database.config(2)).await?);
        seed(&service, layout).await?;
    }

    let reopened = BoardService::new(open_store(&database.config(2)).await?);
    eyre::ensure!(
        snapshot(&reopened).await? == expected(layout),
        "board should survive reopening"
    );
    Ok(())
}

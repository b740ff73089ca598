mod executions;
mod migrate;
mod scenarios;
mod store;
mod variables;

pub use migrate::run_migrations;
pub use store::PostgresStore;

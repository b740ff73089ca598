mod trait_store;
mod types;

pub use trait_store::{ScenarioStore, StoreError, VariableStore};
pub use types::{ExecutionRow, ScenarioRow, VariableRow};
pub(crate) use types::to_json;

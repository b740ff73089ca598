#[derive(Debug, Clone, thiserror::Error)]
pub enum ExecutionError {
    #[error("store error: {0}")]
    Store(#[from] bpa_store::StoreError),
    #[error("task join error: {0}")]
    TaskJoin(String),
    #[error("unknown execution: {0}")]
    UnknownExecution(String),
}

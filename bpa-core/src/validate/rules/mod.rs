pub(crate) mod scenario;
pub(crate) mod step;
pub(crate) mod variable;

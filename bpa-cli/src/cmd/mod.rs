pub mod config;
pub mod doctor;
pub mod history;
pub mod migrate;
pub mod progress;
pub mod result;
pub mod run;
pub mod scenario;
pub mod validate;
pub mod variable;

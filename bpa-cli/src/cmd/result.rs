use crate::exit_codes;
use crate::output::{print_error, print_execution};
use crate::{OutputArgs, StoreArgs};

use super::config::open_store;

pub async fn result_cmd(execution_id: &str, output: OutputArgs, store: StoreArgs) -> i32 {
    let Some(store) = open_store(store, &output).await else {
        return exit_codes::RUNTIME_ERROR;
    };
    match store.get_execution(execution_id).await {
        Ok(Some(result)) => {
            print_execution(output.format, output.quiet, &result);
            exit_codes::SUCCESS
        }
        Ok(None) => {
            print_error(
                output.format,
                output.quiet,
                &format!("execution not found: {execution_id}"),
            );
            exit_codes::RUNTIME_ERROR
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to load execution: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}

use serde::Serialize;

use bpa_store::{run_migrations, PostgresStore};

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::utils::redact_url_password;
use crate::{OutputArgs, StoreArgs};

use super::config::{get_database_url, MEMORY_STORE};

#[derive(Serialize)]
struct MigrateResult {
    success: bool,
    message: String,
}

pub async fn migrate_cmd(store: StoreArgs, max_connections: u32, output: OutputArgs) -> i32 {
    let Some(database_url) = get_database_url(store.store, &output) else {
        return exit_codes::RUNTIME_ERROR;
    };
    if database_url == MEMORY_STORE {
        print_error(output.format, output.quiet, "the in-memory store has no schema to migrate");
        return exit_codes::RUNTIME_ERROR;
    }

    let pg = match PostgresStore::connect(&database_url, max_connections).await {
        Ok(s) => s,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to connect to {}: {e}", redact_url_password(&database_url)),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let outcome = run_migrations(pg.pool()).await;
    pg.close().await;
    match outcome {
        Ok(()) => {
            let result = MigrateResult {
                success: true,
                message: "migrations applied".to_string(),
            };
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: migrations applied");
            } else {
                print_result(output.format, output.quiet, &result);
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("migration failed: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}

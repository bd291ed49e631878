//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `mynotes_core` linkage, start logging from the environment and
//!   check that the configured database opens and migrates.
//! - Keep output deterministic for quick local sanity checks.

use mynotes_core::db::{migrations::schema_version, open_db};
use mynotes_core::{init_logging_from_config, AppConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("mynotes_core ping={}", mynotes_core::ping());
    println!("mynotes_core version={}", mynotes_core::core_version());

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("mynotes_core config error={err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!(
            "mynotes_core log_dir={} error={err}",
            config.log_dir.display()
        );
        return ExitCode::FAILURE;
    }
    println!(
        "mynotes_core log_level={} log_dir={}",
        config.log_level,
        config.log_dir.display()
    );

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("mynotes_core db_path={} error={err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };
    match schema_version(&conn) {
        Ok(version) => {
            println!(
                "mynotes_core db_path={} schema_version={version}",
                config.db_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("mynotes_core schema error={err}");
            ExitCode::FAILURE
        }
    }
}

//! Opens a window showing the particle field.
//!
//! ```text
//! particle-field [config.json]
//! ```
//!
//! Without an argument the stock configuration is used. Set
//! `RUST_LOG=info` to see the selected tier and GPU adapter.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use particle_field::{BackgroundBuilder, FieldConfig};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = match env::args().nth(1).map(PathBuf::from) {
        Some(path) => match FieldConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config from {:?}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => FieldConfig::default(),
    };

    match BackgroundBuilder::new(()).with_config(config).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("particle-field: {}", e);
            ExitCode::FAILURE
        }
    }
}

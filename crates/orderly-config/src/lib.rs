// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Orderly bot.
//!
//! TOML files are looked up in the XDG hierarchy, overridden by `ORDERLY_*`
//! environment variables, deserialized strictly (`deny_unknown_fields`) and
//! validated. Errors come back as miette diagnostics with typo suggestions.
//!
//! ```no_run
//! use orderly_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("database: {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{AgentConfig, DraftsConfig, OrderlyConfig, StorageConfig, TelegramConfig};

/// Loads the configuration from the standard hierarchy and validates it.
pub fn load_and_validate() -> Result<OrderlyConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Loads and validates one explicit file (plus env overrides).
pub fn load_and_validate_path(path: &Path) -> Result<OrderlyConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Loads and validates an inline TOML string.
pub fn load_and_validate_str(toml_content: &str) -> Result<OrderlyConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<OrderlyConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<OrderlyConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    // Figment records absolute paths in error metadata.
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    Some((absolute.display().to_string(), content))
}

/// Contents of every config file that exists, for error spans.
fn collect_toml_sources() -> Vec<(String, String)> {
    loader::config_paths()
        .iter()
        .filter_map(|path| read_source(path))
        .collect()
}

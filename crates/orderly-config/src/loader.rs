// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order (later wins): compiled defaults, `/etc/orderly/orderly.toml`,
//! `~/.config/orderly/orderly.toml`, `./orderly.toml`, `ORDERLY_*` env vars.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::OrderlyConfig;

pub const SYSTEM_CONFIG: &str = "/etc/orderly/orderly.toml";
pub const LOCAL_CONFIG: &str = "orderly.toml";

/// `~/.config/orderly/orderly.toml`, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("orderly").join("orderly.toml"))
}

/// Candidate files in merge order.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG)];
    paths.extend(user_config_path());
    paths.push(PathBuf::from(LOCAL_CONFIG));
    paths
}

/// The full figment, before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(OrderlyConfig::default()));
    for path in config_paths() {
        if path.exists() {
            tracing::debug!(path = %path.display(), "merging config file");
        }
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Loads configuration from the standard hierarchy with env overrides.
pub fn load_config() -> Result<OrderlyConfig, figment::Error> {
    build_figment().extract()
}

/// Loads configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<OrderlyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OrderlyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Loads one explicit file plus env overrides.
pub fn load_config_from_path(path: &Path) -> Result<OrderlyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OrderlyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Maps `ORDERLY_<SECTION>_<KEY>` onto `<section>.<key>`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `ORDERLY_TELEGRAM_BOT_TOKEN` is `telegram.bot_token`.
fn env_provider() -> Env {
    Env::prefixed("ORDERLY_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    ["agent", "telegram", "storage", "drafts"]
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or_else(|| key.to_string())
}

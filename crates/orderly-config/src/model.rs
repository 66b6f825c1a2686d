// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model.
//!
//! Every struct rejects unknown keys so typos surface at startup instead of
//! silently falling back to defaults.

use serde::{Deserialize, Serialize};

/// Top-level Orderly configuration. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrderlyConfig {
    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub drafts: DraftsConfig,
}

/// Bot identity and logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Name used in log lines and the `/start` greeting.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "orderly".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram transport settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API token. Required to serve.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Telegram user ids or usernames allowed to talk to the bot.
    /// An empty list rejects everyone.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

/// Order database settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("orderly").join("orders.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("orders.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Incomplete-order (draft) handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DraftsConfig {
    /// Seconds a conversation may stay silent before its drafts are dropped.
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,

    /// Drafts kept per conversation; the oldest is evicted beyond this.
    #[serde(default = "default_max_per_conversation")]
    pub max_per_conversation: usize,

    /// Example values offered when asking for a field.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

impl Default for DraftsConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: default_idle_ttl_secs(),
            max_per_conversation: default_max_per_conversation(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

fn default_idle_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_max_per_conversation() -> usize {
    20
}

fn default_suggestion_limit() -> usize {
    3
}

impl OrderlyConfig {
    /// Renders the configuration as TOML, with the bot token masked.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut shown = self.clone();
        if shown.telegram.bot_token.is_some() {
            shown.telegram.bot_token = Some("********".to_string());
        }
        toml::to_string_pretty(&shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OrderlyConfig::default();
        assert_eq!(config.agent.name, "orderly");
        assert_eq!(config.agent.log_level, "info");
        assert!(config.telegram.bot_token.is_none());
        assert!(config.telegram.allowed_users.is_empty());
        assert!(config.storage.database_path.ends_with("orders.db"));
        assert!(config.storage.wal_mode);
        assert_eq!(config.drafts.idle_ttl_secs, 86_400);
        assert_eq!(config.drafts.max_per_conversation, 20);
        assert_eq!(config.drafts.suggestion_limit, 3);
    }

    #[test]
    fn redacted_toml_hides_token() {
        let mut config = OrderlyConfig::default();
        config.telegram.bot_token = Some("123:SECRET".into());
        let rendered = config.to_redacted_toml().unwrap();
        assert!(!rendered.contains("SECRET"));
        assert!(rendered.contains("[drafts]"));
    }
}

// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::OrderlyConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates `config`, collecting every failure instead of stopping at the first.
pub fn validate_config(config: &OrderlyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.agent.name.trim().is_empty() {
        fail("agent.name must not be empty".to_string());
    }

    let level = config.agent.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "agent.log_level `{}` is not one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        fail("telegram.bot_token must not be blank when set".to_string());
    }

    for (i, user) in config.telegram.allowed_users.iter().enumerate() {
        if user.trim().trim_start_matches('@').is_empty() {
            fail(format!("telegram.allowed_users[{i}] must not be empty"));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.drafts.idle_ttl_secs == 0 {
        fail("drafts.idle_ttl_secs must be at least 1".to_string());
    }

    if config.drafts.max_per_conversation == 0 {
        fail("drafts.max_per_conversation must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&OrderlyConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = OrderlyConfig::default();
        config.agent.log_level = "loud".into();
        config.storage.database_path = " ".into();
        config.drafts.max_per_conversation = 0;
        config.telegram.allowed_users = vec!["@".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = OrderlyConfig::default();
        config.agent.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}

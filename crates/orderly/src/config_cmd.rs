// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `orderly config`: prints the effective configuration with secrets redacted.

use orderly_config::OrderlyConfig;

pub fn summary(config: &OrderlyConfig) -> String {
    let token = match config.telegram.bot_token.as_deref() {
        Some(token) if !token.trim().is_empty() => "set",
        _ => "not set (required by `orderly serve`)",
    };
    let allowed = if config.telegram.allowed_users.is_empty() {
        "none (every message is ignored)".to_string()
    } else {
        config.telegram.allowed_users.join(", ")
    };

    [
        "configuration is valid".to_string(),
        String::new(),
        "[agent]".to_string(),
        format!("name = {}", config.agent.name),
        format!("log_level = {}", config.agent.log_level),
        String::new(),
        "[telegram]".to_string(),
        format!("bot_token = {token}"),
        format!("allowed_users = {allowed}"),
        String::new(),
        "[storage]".to_string(),
        format!("database_path = {}", config.storage.database_path),
        format!("wal_mode = {}", config.storage.wal_mode),
        String::new(),
        "[drafts]".to_string(),
        format!("idle_ttl_secs = {}", config.drafts.idle_ttl_secs),
        format!("max_per_conversation = {}", config.drafts.max_per_conversation),
        format!("suggestion_limit = {}", config.drafts.suggestion_limit),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_never_printed() {
        let mut config = OrderlyConfig::default();
        config.telegram.bot_token = Some("123456:SECRET".into());
        config.telegram.allowed_users = vec!["@anna".into(), "42".into()];
        let text = summary(&config);
        assert!(!text.contains("SECRET"));
        assert!(text.contains("bot_token = set"));
        assert!(text.contains("allowed_users = @anna, 42"));
    }

    #[test]
    fn missing_token_is_flagged() {
        let text = summary(&OrderlyConfig::default());
        assert!(text.contains("bot_token = not set"));
        assert!(text.contains("allowed_users = none"));
    }
}

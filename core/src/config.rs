use std::time::Duration;

use serde::Deserialize;

use crate::sync::{PollPlan, NOTIFICATION_POLL, QUESTION_SYNC};

const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Runtime settings for the browser client.
///
/// Defaults come from `BUGBEE_API_URL` / `BUGBEE_GOOGLE_CLIENT_ID` at build
/// time; the page can override them (see [`ClientConfig::with_overrides`]).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub api_base: String,
    pub google_client_id: String,
    pub notification_poll_secs: u64,
    pub question_sync_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: trim_base(option_env!("BUGBEE_API_URL").unwrap_or(DEFAULT_API_BASE)),
            google_client_id: option_env!("BUGBEE_GOOGLE_CLIENT_ID")
                .unwrap_or_default()
                .to_string(),
            notification_poll_secs: NOTIFICATION_POLL.interval.as_secs(),
            question_sync_secs: QUESTION_SYNC.interval.as_secs(),
        }
    }
}

fn trim_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

impl ClientConfig {
    /// Parse a JSON config blob; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        config.api_base = trim_base(&config.api_base);
        Ok(config)
    }

    /// Apply page-level overrides. Blank values are ignored.
    pub fn with_overrides(mut self, api_base: Option<&str>, google_client_id: Option<&str>) -> Self {
        if let Some(base) = api_base.map(str::trim).filter(|b| !b.is_empty()) {
            self.api_base = trim_base(base);
        }
        if let Some(id) = google_client_id.map(str::trim).filter(|id| !id.is_empty()) {
            self.google_client_id = id.to_string();
        }
        self
    }

    pub fn url(&self, path: &str) -> String {
        crate::api::paths::join(&self.api_base, path)
    }

    pub fn notification_poll(&self) -> PollPlan {
        PollPlan {
            interval: Duration::from_secs(self.notification_poll_secs.max(1)),
            ..NOTIFICATION_POLL
        }
    }

    pub fn question_sync(&self) -> PollPlan {
        PollPlan {
            interval: Duration::from_secs(self.question_sync_secs.max(1)),
            ..QUESTION_SYNC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_poll_plans() {
        let config = ClientConfig::default();
        assert_eq!(config.notification_poll(), NOTIFICATION_POLL);
        assert_eq!(config.question_sync(), QUESTION_SYNC);
        assert!(!config.api_base.ends_with('/'));
    }

    #[test]
    fn overrides_trim_and_skip_blanks() {
        let config = ClientConfig::default()
            .with_overrides(Some(" https://api.bugbee.dev/ "), Some(""));
        assert_eq!(config.api_base, "https://api.bugbee.dev");
        assert_eq!(config.url("/vote"), "https://api.bugbee.dev/vote");
        assert_eq!(config.google_client_id, ClientConfig::default().google_client_id);
    }

    #[test]
    fn json_keeps_defaults_for_missing_keys() {
        let config =
            ClientConfig::from_json(r#"{"apiBase":"http://x/","notificationPollSecs":3}"#).unwrap();
        assert_eq!(config.api_base, "http://x");
        assert_eq!(config.notification_poll().interval, Duration::from_secs(3));
        assert!(config.notification_poll().immediate);
        assert_eq!(config.question_sync_secs, 60);
    }
}

//! Configuration module - environment variable parsing

use std::env;

/// Client configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// WebSocket endpoint of the game server
    pub server_url: String,
    /// Channel topic to join
    pub game_topic: String,
    /// Auth token forwarded in the join payload
    pub user_token: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url = env::var("SERVER_URL")
            .unwrap_or_else(|_| "ws://127.0.0.1:4000/socket/websocket".to_string());
        validate_ws_url(&server_url)?;

        Ok(Self {
            server_url,

            game_topic: env::var("GAME_TOPIC").unwrap_or_else(|_| "game:default".to_string()),

            user_token: env::var("USER_TOKEN").map_err(|_| ConfigError::Missing("USER_TOKEN"))?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Check that the server URL uses a WebSocket scheme
fn validate_ws_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("ws://") || url.starts_with("wss://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidServerUrl)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("SERVER_URL must use a ws:// or wss:// scheme")]
    InvalidServerUrl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ws_schemes() {
        assert!(validate_ws_url("ws://127.0.0.1:4000/socket/websocket").is_ok());
        assert!(validate_ws_url("wss://game.example.com/socket/websocket").is_ok());
    }

    #[test]
    fn rejects_http_scheme() {
        assert!(matches!(
            validate_ws_url("http://127.0.0.1:4000"),
            Err(ConfigError::InvalidServerUrl)
        ));
    }
}

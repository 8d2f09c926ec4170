/// Driver configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Display name for the white player.
    pub white_name: String,
    /// Display name for the black player.
    pub black_name: String,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        AppConfig {
            white_name: std::env::var("CHESS_WHITE_NAME")
                .unwrap_or_else(|_| "Player".to_string()),
            black_name: std::env::var("CHESS_BLACK_NAME")
                .unwrap_or_else(|_| "Player".to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            white_name: "Player".to_string(),
            black_name: "Player".to_string(),
        }
    }
}

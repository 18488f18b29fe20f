use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use lazy_static::lazy_static;

pub const APP_DIR: &str = "com.studytrack.app";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Generative model used for plan generation and concept explanations
    pub model: String,
    /// Base URL of the generateContent API
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Curriculum length requested at generation time
    pub curriculum_days: u32,
    /// Default daily target hours in the generated plan
    pub default_target_hours: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            model: "gemini-3-pro-preview".to_string(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 120,
            curriculum_days: 20,
            default_target_hours: 4,
        }
    }
}

/// Platform app-data directory for all persisted studytrack files
pub fn app_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push("Library/Application Support");
            dir.push(APP_DIR);
            return dir;
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            let mut dir = PathBuf::from(appdata);
            dir.push(APP_DIR);
            return dir;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push(".local/share");
            dir.push(APP_DIR);
            return dir;
        }
    }

    // Fallback
    PathBuf::from(".")
}

fn get_config_path() -> PathBuf {
    let mut path = app_data_dir();
    path.push("tracker.toml");
    path
}

fn load_tracker_config_internal() -> TrackerConfig {
    let config_path = get_config_path();

    if let Ok(content) = fs::read_to_string(&config_path) {
        if let Ok(config) = toml::from_str::<TrackerConfig>(&content) {
            tracing::info!(path = ?config_path, "Loaded tracker config");
            return config;
        } else {
            tracing::warn!(path = ?config_path, "Failed to parse tracker.toml, using defaults");
        }
    }

    // Return defaults if file doesn't exist or parsing fails
    TrackerConfig::default()
}

lazy_static! {
    static ref TRACKER_CONFIG: TrackerConfig = load_tracker_config_internal();
}

/// Get the cached tracker configuration (loaded once at startup)
pub fn get_tracker_config() -> &'static TrackerConfig {
    &TRACKER_CONFIG
}

/// API key for the generative API, read from the environment on every call
/// so a missing key surfaces as a request error rather than a startup panic
pub fn api_key() -> Option<String> {
    std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty())
}

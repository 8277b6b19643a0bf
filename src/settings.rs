//! Application settings storage
//!
//! Stores configuration like the Gemini API key in a JSON file in the
//! platform config directory. The `GOOGLE_API_KEY` environment variable
//! always takes precedence over the stored key, so a missing file never
//! blocks startup; it only means demo mode until a key is provided.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Global settings instance
static SETTINGS: RwLock<Option<Settings>> = RwLock::new(None);

/// Path to config file (set during init)
static CONFIG_PATH: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Cumulative model usage, persisted across runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UsageStats {
    #[serde(default)]
    pub total_prompt_tokens: u64,
    #[serde(default)]
    pub total_response_tokens: u64,
    #[serde(default)]
    pub dispatch_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    /// Model name sent to the generative API
    #[serde(default = "default_model")]
    pub model: String,
    /// Document text is truncated to this many bytes before dispatch
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
    #[serde(default)]
    pub usage_stats: UsageStats,
}

fn default_model() -> String {
    crate::ai_client::DEFAULT_MODEL.to_string()
}

fn default_max_document_bytes() -> usize {
    crate::analyzer::DEFAULT_MAX_DOCUMENT_BYTES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: default_model(),
            max_document_bytes: default_max_document_bytes(),
            usage_stats: UsageStats::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk or create default
    fn load(path: &PathBuf) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => Settings::default(),
            }
        } else {
            Settings::default()
        }
    }

    /// Save settings to disk
    fn save(&self, path: &PathBuf) -> Result<(), String> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(path, content)
            .map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }
}

/// Initialize settings with the config directory
pub fn init(config_dir: PathBuf) {
    let config_path = config_dir.join("settings.json");
    let settings = Settings::load(&config_path);

    *CONFIG_PATH.write().unwrap() = Some(config_path);
    *SETTINGS.write().unwrap() = Some(settings);
}

/// Run a closure over the current settings, saving afterwards
fn update<F: FnOnce(&mut Settings)>(f: F) -> Result<(), String> {
    let mut settings_guard = SETTINGS.write()
        .map_err(|_| "Failed to acquire settings lock")?;

    let settings = settings_guard.get_or_insert_with(Settings::default);
    f(settings);

    let config_path = CONFIG_PATH.read()
        .map_err(|_| "Failed to acquire config path lock")?
        .clone()
        .ok_or("Settings not initialized")?;

    settings.save(&config_path)
}

/// Get the current API key (checks env var first, then stored setting)
pub fn get_api_key() -> Option<String> {
    // Environment variable takes precedence
    if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
        if !key.is_empty() {
            return Some(key);
        }
    }

    // Fall back to stored setting
    let guard = SETTINGS.read().ok()?;
    let settings = guard.as_ref()?;
    settings.gemini_api_key.clone()
}

/// Check if an API key is available (absence selects demo mode)
pub fn has_api_key() -> bool {
    get_api_key().map(|k| !k.is_empty()).unwrap_or(false)
}

/// Set and save the API key
pub fn set_api_key(key: String) -> Result<(), String> {
    update(|s| {
        s.gemini_api_key = if key.is_empty() { None } else { Some(key) };
    })?;
    println!("API key saved to settings");
    Ok(())
}

/// Get masked API key for display (shows first/last 4 chars)
pub fn get_masked_api_key() -> Option<String> {
    get_api_key().map(|key| {
        if key.len() > 12 {
            format!("{}...{}", &key[..8], &key[key.len() - 4..])
        } else {
            "*".repeat(key.len())
        }
    })
}

/// Get the configured model name
pub fn get_model() -> String {
    SETTINGS.read().ok()
        .and_then(|g| g.as_ref().map(|s| s.model.clone()))
        .unwrap_or_else(default_model)
}

/// Set and save the model name
pub fn set_model(model: String) -> Result<(), String> {
    if model.is_empty() {
        return Err("Model name cannot be empty".to_string());
    }
    update(|s| s.model = model)
}

/// Get the document byte cap applied before dispatch
pub fn get_max_document_bytes() -> usize {
    SETTINGS.read().ok()
        .and_then(|g| g.as_ref().map(|s| s.max_document_bytes))
        .unwrap_or_else(default_max_document_bytes)
}

/// Set and save the document byte cap
pub fn set_max_document_bytes(max_bytes: usize) -> Result<(), String> {
    if max_bytes == 0 {
        return Err("Document cap must be positive".to_string());
    }
    update(|s| s.max_document_bytes = max_bytes)
}

/// Record token usage from one live dispatch
pub fn add_gemini_tokens(prompt_tokens: u64, response_tokens: u64) -> Result<(), String> {
    update(|s| {
        s.usage_stats.total_prompt_tokens += prompt_tokens;
        s.usage_stats.total_response_tokens += response_tokens;
        s.usage_stats.dispatch_count += 1;
    })
}

/// Get cumulative usage stats
pub fn get_usage_stats() -> UsageStats {
    SETTINGS.read().ok()
        .and_then(|g| g.as_ref().map(|s| s.usage_stats.clone()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Settings live behind process-wide statics, so everything runs in a
    // single test to avoid racing inits from the parallel test harness.
    #[test]
    fn test_settings_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path().to_path_buf());

        assert_eq!(get_model(), crate::ai_client::DEFAULT_MODEL);
        assert_eq!(get_max_document_bytes(), crate::analyzer::DEFAULT_MAX_DOCUMENT_BYTES);

        set_model("gemini-1.5-pro".to_string()).unwrap();
        assert_eq!(get_model(), "gemini-1.5-pro");
        assert!(set_model(String::new()).is_err());

        set_max_document_bytes(1000).unwrap();
        assert_eq!(get_max_document_bytes(), 1000);
        assert!(set_max_document_bytes(0).is_err());

        add_gemini_tokens(100, 20).unwrap();
        add_gemini_tokens(50, 10).unwrap();
        let stats = get_usage_stats();
        assert_eq!(stats.total_prompt_tokens, 150);
        assert_eq!(stats.total_response_tokens, 30);
        assert_eq!(stats.dispatch_count, 2);

        // Settings survive a reload from the same directory
        init(dir.path().to_path_buf());
        assert_eq!(get_model(), "gemini-1.5-pro");
        assert_eq!(get_usage_stats().dispatch_count, 2);
    }
}

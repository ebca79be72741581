/**
 * ============================================================================
 * BOOTH CONFIGURATION MODULE
 * ============================================================================
 *
 * PURPOSE: Configuration schema, persistence, and validation
 *
 * STORAGE: JSON at {config_dir}/photobooth/config.json
 *
 * FUNCTIONALITY:
 * - Define configuration schema with production defaults
 * - Validate configuration values
 * - Load configuration from disk (defaults when absent)
 * - Save configuration atomically (temp file + rename)
 *
 * ============================================================================
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::booth::types::{DEFAULT_COUNTDOWN_TICKS, DEFAULT_SHOT_PAUSE_MS};
use crate::strip::layout::StripStyle;

// Booth configuration. The shot count and tick cadence are fixed by the
// sequence contract; everything tunable lives here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoothConfig {
    // Preferred camera resolution; the device may negotiate a close match
    pub preferred_width: u32,
    pub preferred_height: u32,

    // Countdown ticks before each shot (1s cadence)
    #[serde(default = "default_countdown_ticks")]
    pub countdown_ticks: u32,

    // Pause between a capture and the next countdown (milliseconds)
    #[serde(default = "default_shot_pause_ms")]
    pub shot_pause_ms: u64,

    // Strip style preset
    #[serde(default)]
    pub style: StripStyle,

    // Export directory override; platform pictures dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    // Optional shutter sound file (wav/mp3/ogg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutter_sound: Option<PathBuf>,
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            preferred_width: 1280,
            preferred_height: 720,
            countdown_ticks: default_countdown_ticks(),
            shot_pause_ms: default_shot_pause_ms(),
            style: StripStyle::default(),
            export_dir: None,
            shutter_sound: None,
        }
    }
}

fn default_countdown_ticks() -> u32 {
    DEFAULT_COUNTDOWN_TICKS
}

fn default_shot_pause_ms() -> u64 {
    DEFAULT_SHOT_PAUSE_MS
}

impl BoothConfig {
    // Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.preferred_width < 160 || self.preferred_width > 4096 {
            return Err("preferred_width must be between 160 and 4096".to_string());
        }
        if self.preferred_height < 120 || self.preferred_height > 4096 {
            return Err("preferred_height must be between 120 and 4096".to_string());
        }
        if self.countdown_ticks < 1 || self.countdown_ticks > 10 {
            return Err("countdown_ticks must be between 1 and 10".to_string());
        }
        if self.shot_pause_ms > 10_000 {
            return Err("shot_pause_ms must be 10000 or less".to_string());
        }
        Ok(())
    }
}

// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("photobooth").join("config.json"))
}

// Load configuration from disk; defaults when the file doesn't exist
pub fn load_config(path: &Path) -> Result<BoothConfig, String> {
    if !path.exists() {
        log::info!("Booth config not found at {}, using defaults", path.display());
        return Ok(BoothConfig::default());
    }

    let json_str = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    let config: BoothConfig = serde_json::from_str(&json_str)
        .map_err(|e| format!("Failed to parse config JSON: {}", e))?;

    config.validate()?;

    log::info!("Loaded booth config from {}", path.display());
    Ok(config)
}

// Save configuration atomically: temp file + rename
pub fn save_config(path: &Path, config: &BoothConfig) -> Result<(), String> {
    config.validate()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let json_str = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json_str)
        .map_err(|e| format!("Failed to write temporary config file: {}", e))?;

    fs::rename(&temp_path, path)
        .map_err(|e| format!("Failed to save config file: {}", e))?;

    log::info!("Saved booth config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = BoothConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.preferred_width, 1280);
        assert_eq!(config.preferred_height, 720);
        assert_eq!(config.countdown_ticks, 3);
        assert_eq!(config.shot_pause_ms, 1000);
    }

    #[test]
    fn test_config_validation_ranges() {
        let mut config = BoothConfig::default();

        config.countdown_ticks = 0;
        assert!(config.validate().is_err());
        config.countdown_ticks = 11;
        assert!(config.validate().is_err());
        config.countdown_ticks = 3;
        assert!(config.validate().is_ok());

        config.shot_pause_ms = 20_000;
        assert!(config.validate().is_err());
        config.shot_pause_ms = 0;
        assert!(config.validate().is_ok());

        config.preferred_width = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = BoothConfig::default();
        config.countdown_ticks = 5;
        config.style = StripStyle::Midnight;
        config.shutter_sound = Some(PathBuf::from("/tmp/shutter.wav"));

        save_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(&dir.path().join("nope.json")).unwrap();
        assert_eq!(loaded, BoothConfig::default());
    }

    #[test]
    fn test_invalid_config_rejected_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = BoothConfig::default();
        config.countdown_ticks = 0;
        assert!(save_config(&path, &config).is_err());
        assert!(!path.exists());
    }
}

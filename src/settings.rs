//! Host settings and preferences
//!
//! Persisted through the storage adapter under their own key, separate from
//! progression. Missing or corrupted settings fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_TIME, SIM_DT};
use crate::persistence::{StorageAdapter, StorageError, load_json, save_json};

/// Simulation rate presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SimRate {
    /// 60 Hz
    #[default]
    Standard,
    /// 120 Hz, smoother on high refresh displays
    High,
}

impl SimRate {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimRate::Standard => "60 Hz",
            SimRate::High => "120 Hz",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "60" | "standard" => Some(SimRate::Standard),
            "120" | "high" => Some(SimRate::High),
            _ => None,
        }
    }

    /// Fixed step in seconds
    pub fn dt(&self) -> f32 {
        match self {
            SimRate::Standard => SIM_DT,
            SimRate::High => SIM_DT / 2.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sim_rate: SimRate,
    /// Largest frame time the clock accepts, in seconds
    pub max_frame_time: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence effects while the host is in the background
    pub mute_on_blur: bool,
    /// Pause the clock while the host is in the background
    pub auto_pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sim_rate: SimRate::Standard,
            max_frame_time: MAX_FRAME_TIME,
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
            auto_pause_on_blur: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "settings";

    /// Effective sfx gain (0 when either slider is at 0)
    pub fn sfx_gain(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Clamp out-of-range values loaded from storage
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        if !(self.max_frame_time.is_finite() && self.max_frame_time > 0.0) {
            self.max_frame_time = MAX_FRAME_TIME;
        }
        self
    }

    pub fn load(storage: &dyn StorageAdapter) -> Self {
        match load_json::<Settings>(storage, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn StorageAdapter) -> Result<(), StorageError> {
        save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_defaults_when_missing_or_corrupt() {
        let mut store = MemoryStorage::new();
        assert_eq!(Settings::load(&store), Settings::default());
        store.set("settings", "not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStorage::new();
        let settings = Settings {
            sim_rate: SimRate::High,
            sfx_volume: 0.5,
            ..Default::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStorage::new();
        store.set("settings", r#"{"master_volume": 3.0}"#).unwrap();
        let s = Settings::load(&store);
        assert_eq!(s.master_volume, 1.0);
        assert_eq!(s.sim_rate, SimRate::Standard);
        assert_eq!(s.max_frame_time, MAX_FRAME_TIME);
    }

    #[test]
    fn test_sim_rate() {
        assert_eq!(SimRate::from_str("HIGH"), Some(SimRate::High));
        assert_eq!(SimRate::from_str("30"), None);
        assert_eq!(SimRate::High.dt() * 2.0, SimRate::Standard.dt());
        assert_eq!(SimRate::Standard.as_str(), "60 Hz");
    }

    #[test]
    fn test_sfx_gain() {
        let s = Settings::default();
        assert!((s.sfx_gain() - 0.8).abs() < 1e-6);
    }
}

//! Render preferences
//!
//! Persisted in LocalStorage, shared by every visualization on the page.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Shadow blur multiplier
    pub fn glow_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.0,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }

    /// Fraction of trail points drawn (newest kept)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }

    /// Whether to draw the background lattice
    pub fn grid_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Visualization settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Packet and bubble trails
    pub trails: bool,
    /// Glow halos and drop shadows
    pub glow: bool,
    /// Topic labels on hover
    pub labels: bool,
    /// Background lattice
    pub grid: bool,

    // === Accessibility ===
    /// Opaque clear instead of the motion-trail fade
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            trails: true,
            glow: true,
            labels: true,
            grid: true,
            reduced_motion: false,
        }
    }
}

/// Alpha of the per-frame fade fill
const FADE_ALPHA: f32 = 0.1;

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        if preset == QualityPreset::Low {
            self.glow = false;
        }
    }

    /// Effective shadow blur multiplier
    pub fn glow_scale(&self) -> f32 {
        if self.glow { self.quality.glow_scale() } else { 0.0 }
    }

    /// Effective grid toggle
    pub fn grid_enabled(&self) -> bool {
        self.grid && self.quality.grid_enabled()
    }

    /// How many of the newest `len` trail points to draw
    pub fn trail_points(&self, len: usize) -> usize {
        if !self.trails {
            return 0;
        }
        ((len as f32 * self.quality.trail_quality()).round() as usize).min(len)
    }

    /// Alpha of the frame-start fill (1.0 = hard clear)
    pub fn fade_alpha(&self) -> f32 {
        if self.reduced_motion { 1.0 } else { FADE_ALPHA }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "circuit_city_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

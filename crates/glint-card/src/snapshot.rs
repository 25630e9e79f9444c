//! Named preset snapshots of a card configuration.
//!
//! A snapshot is a flat, serializable record of the style and effect
//! parameters a user has dialed in. Presets pair a snapshot with a name
//! and persist as one JSON document through a [`PresetStorage`] backend.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use glint_core::{Color, GlintResult};

use crate::params::{FoilParams, FoilPattern, LightParams};
use crate::style::CardStyle;

/// A point-in-time capture of card style and effect parameters.
///
/// Foil fields are optional so presets written before the foil controls
/// existed still decode; absent fields leave the live values untouched
/// on apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub corner_radius: f32,
    pub card_width: f32,
    pub card_height: f32,
    pub parallax_intensity: f32,
    pub tilt_intensity: f32,
    pub sensitivity: f32,
    pub smoothing: f32,
    /// Scene background, stored as straight [r, g, b, a] in 0..=1.
    pub background_rgba: [f32; 4],
    /// Card base color, stored as straight [r, g, b, a] in 0..=1.
    pub base_rgba: [f32; 4],
    pub light_intensity: f32,
    pub light_size: f32,
    pub light_stretch: f32,
    pub light_softness: f32,
    #[serde(default)]
    pub foil_intensity: Option<f32>,
    #[serde(default)]
    pub foil_speed: Option<f32>,
    #[serde(default)]
    pub foil_saturation: Option<f32>,
    #[serde(default)]
    pub foil_transparency: Option<f32>,
    #[serde(default)]
    pub foil_pattern: Option<u32>,
}

impl CardSnapshot {
    /// Captures the current configuration.
    pub fn capture(
        style: &CardStyle,
        background: Color,
        base: Color,
        foil: &FoilParams,
        light: &LightParams,
    ) -> Self {
        Self {
            corner_radius: style.corner_radius,
            card_width: style.width,
            card_height: style.height,
            parallax_intensity: style.parallax_intensity,
            tilt_intensity: style.tilt_intensity,
            sensitivity: style.motion_sensitivity,
            smoothing: style.motion_smoothing,
            background_rgba: background.to_components(),
            base_rgba: base.to_components(),
            light_intensity: light.intensity,
            light_size: light.size,
            light_stretch: light.stretch,
            light_softness: light.softness,
            foil_intensity: Some(foil.intensity),
            foil_speed: Some(foil.speed),
            foil_saturation: Some(foil.saturation),
            foil_transparency: Some(foil.transparency),
            foil_pattern: Some(foil.pattern.code()),
        }
    }

    /// Writes the captured values back into a live configuration.
    pub fn apply(
        &self,
        style: &mut CardStyle,
        background: &mut Color,
        base: &mut Color,
        foil: &mut FoilParams,
        light: &mut LightParams,
    ) {
        style.corner_radius = self.corner_radius;
        style.width = self.card_width;
        style.height = self.card_height;
        style.parallax_intensity = self.parallax_intensity;
        style.tilt_intensity = self.tilt_intensity;
        style.motion_sensitivity = self.sensitivity;
        style.motion_smoothing = self.smoothing;
        *background = Color::from_components(self.background_rgba);
        *base = Color::from_components(self.base_rgba);
        light.intensity = self.light_intensity;
        light.size = self.light_size;
        light.stretch = self.light_stretch;
        light.softness = self.light_softness;
        if let Some(v) = self.foil_intensity {
            foil.intensity = v;
        }
        if let Some(v) = self.foil_speed {
            foil.speed = v;
        }
        if let Some(v) = self.foil_saturation {
            foil.saturation = v;
        }
        if let Some(v) = self.foil_transparency {
            foil.transparency = v;
        }
        if let Some(code) = self.foil_pattern {
            foil.pattern = FoilPattern::from_code(code);
        }
    }
}

/// A named, identified preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: Uuid,
    pub name: String,
    pub snapshot: CardSnapshot,
}

/// Persistence backend for the preset collection.
pub trait PresetStorage: Send {
    /// Loads the persisted collection; corruption or absence yields an
    /// empty list rather than an error.
    fn load(&self) -> Vec<Preset>;
    /// Replaces the persisted collection.
    fn persist(&mut self, presets: &[Preset]) -> GlintResult<()>;
}

/// Presets as a single JSON file on disk.
#[derive(Debug)]
pub struct JsonPresetStore {
    path: PathBuf,
}

impl JsonPresetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PresetStorage for JsonPresetStore {
    fn load(&self) -> Vec<Preset> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_slice(&data) {
            Ok(presets) => presets,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "discarding unreadable preset file");
                Vec::new()
            }
        }
    }

    fn persist(&mut self, presets: &[Preset]) -> GlintResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(presets)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory preset collection backed by a storage backend. Loads on
/// construction, persists after every mutation.
pub struct PresetStore {
    storage: Box<dyn PresetStorage>,
    presets: Vec<Preset>,
}

impl PresetStore {
    pub fn new(storage: impl PresetStorage + 'static) -> Self {
        let storage = Box::new(storage);
        let presets = storage.load();
        Self { storage, presets }
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Saves a snapshot under a name and returns the new preset's id.
    pub fn save(&mut self, name: impl Into<String>, snapshot: CardSnapshot) -> GlintResult<Uuid> {
        let preset = Preset {
            id: Uuid::new_v4(),
            name: name.into(),
            snapshot,
        };
        let id = preset.id;
        self.presets.push(preset);
        self.storage.persist(&self.presets)?;
        Ok(id)
    }

    /// Removes the preset with the given id. Unknown ids are ignored.
    pub fn delete(&mut self, id: Uuid) -> GlintResult<()> {
        self.presets.retain(|p| p.id != id);
        self.storage.persist(&self.presets)?;
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> CardSnapshot {
        let style = CardStyle::default().corner_radius(14.0);
        CardSnapshot::capture(
            &style,
            Color::WHITE,
            Color::GOLD,
            &FoilParams::default(),
            &LightParams::default(),
        )
    }

    #[test]
    fn test_capture_apply_round_trip() {
        let snapshot = sample_snapshot();
        let mut style = CardStyle::default();
        let mut background = Color::BLACK;
        let mut base = Color::BLACK;
        let mut foil = FoilParams {
            intensity: 0.0,
            ..FoilParams::default()
        };
        let mut light = LightParams::default();

        snapshot.apply(&mut style, &mut background, &mut base, &mut foil, &mut light);

        assert_eq!(style.corner_radius, 14.0);
        assert_eq!(background, Color::WHITE);
        assert_eq!(base, Color::GOLD);
        assert_eq!(foil.intensity, FoilParams::default().intensity);
    }

    #[test]
    fn test_legacy_snapshot_without_foil_fields() {
        // Presets written before the foil controls existed omit those
        // keys entirely.
        let json = r#"{
            "corner_radius": 20.0,
            "card_width": 300.0,
            "card_height": 420.0,
            "parallax_intensity": 50.0,
            "tilt_intensity": 15.0,
            "sensitivity": 2.2,
            "smoothing": 0.15,
            "background_rgba": [1.0, 1.0, 1.0, 1.0],
            "base_rgba": [0.85, 0.65, 0.13, 1.0],
            "light_intensity": 0.4,
            "light_size": 0.3,
            "light_stretch": 8.0,
            "light_softness": 2.0
        }"#;
        let snapshot: CardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.foil_intensity, None);

        let mut style = CardStyle::default();
        let mut background = Color::BLACK;
        let mut base = Color::BLACK;
        let mut foil = FoilParams {
            intensity: 0.33,
            ..FoilParams::default()
        };
        let mut light = LightParams::default();
        snapshot.apply(&mut style, &mut background, &mut base, &mut foil, &mut light);
        // Absent foil fields leave the live values alone.
        assert_eq!(foil.intensity, 0.33);
        assert_eq!(style.parallax_intensity, 50.0);
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");

        let mut store = PresetStore::new(JsonPresetStore::new(&path));
        let id = store.save("Gold Classic", sample_snapshot()).unwrap();
        assert_eq!(store.presets().len(), 1);

        // A fresh store over the same file sees the saved preset.
        let reloaded = PresetStore::new(JsonPresetStore::new(&path));
        assert_eq!(reloaded.presets().len(), 1);
        assert_eq!(reloaded.presets()[0].name, "Gold Classic");
        assert_eq!(reloaded.get(id).unwrap().id, id);
    }

    #[test]
    fn test_delete_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");

        let mut store = PresetStore::new(JsonPresetStore::new(&path));
        let id = store.save("One", sample_snapshot()).unwrap();
        store.save("Two", sample_snapshot()).unwrap();
        store.delete(id).unwrap();

        let reloaded = PresetStore::new(JsonPresetStore::new(&path));
        assert_eq!(reloaded.presets().len(), 1);
        assert_eq!(reloaded.presets()[0].name, "Two");
    }

    #[test]
    fn test_corrupt_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        fs::write(&path, b"not json {").unwrap();

        let store = PresetStore::new(JsonPresetStore::new(&path));
        assert!(store.presets().is_empty());
    }

    #[test]
    fn test_missing_file_yields_empty_store() {
        let store = PresetStore::new(JsonPresetStore::new("/nonexistent/dir/presets.json"));
        assert!(store.presets().is_empty());
    }
}

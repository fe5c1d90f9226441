use serde::{Deserialize, Serialize};
use showreel_assets::AssetManifest;
use showreel_input::DEFAULT_DEBOUNCE_MS;
use showreel_scene::Camera;
use showreel_storyboard::{BusyPolicy, CastNames};
use std::path::Path;

use crate::PresentationError;

/// Per-frame behaviour of the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Radians added to the spinning model's z rotation every tick.
    pub spin_rate: f32,
    /// Quiet period before a burst of wheel events becomes one trigger.
    pub debounce_ms: f64,
    pub busy_policy: BusyPolicy,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            spin_rate: 0.015,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            busy_policy: BusyPolicy::default(),
        }
    }
}

/// Everything needed to boot a presentation, as one JSON document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PresentationManifest {
    #[serde(default)]
    pub assets: AssetManifest,
    #[serde(default)]
    pub cast: CastNames,
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub frame: FrameConfig,
}

impl PresentationManifest {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PresentationError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresentationError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn to_json(&self) -> Result<String, PresentationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_defaults() {
        let frame = FrameConfig::default();
        assert_eq!(frame.spin_rate, 0.015);
        assert_eq!(frame.debounce_ms, 100.0);
        assert_eq!(frame.busy_policy, BusyPolicy::PrimaryTween);
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut manifest = PresentationManifest::default();
        manifest.frame.busy_policy = BusyPolicy::AllTweens;
        manifest.save(tmp.path()).unwrap();
        assert_eq!(PresentationManifest::load(tmp.path()).unwrap(), manifest);
    }

    #[test]
    fn partial_document_takes_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            r#"{ "frame": { "spin_rate": 0.03 }, "cast": {
                "lead": "A", "companion": "B", "decoration": "decoration", "ground": "ground" } }"#,
        )
        .unwrap();
        let loaded = PresentationManifest::load(tmp.path()).unwrap();
        assert_eq!(loaded.frame.spin_rate, 0.03);
        assert_eq!(loaded.frame.debounce_ms, 100.0);
        assert_eq!(loaded.cast.lead, "A");
        assert_eq!(loaded.assets, AssetManifest::default());
        assert_eq!(loaded.camera, Camera::default());
    }

    #[test]
    fn malformed_document_is_a_json_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "{ not json").unwrap();
        assert!(matches!(
            PresentationManifest::load(tmp.path()),
            Err(PresentationError::Json(_))
        ));
    }
}

use glam::Vec3;
use serde::{Deserialize, Serialize};
use showreel_common::Transform;
use std::path::Path;

use crate::AssetError;

/// One model resource and where it starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSetup {
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    /// Rotated a little every frame, whatever the storyboard is doing.
    #[serde(default)]
    pub spin: bool,
}

impl ModelSetup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            spin: false,
        }
    }

    pub fn at(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn spinning(mut self) -> Self {
        self.spin = true;
        self
    }
}

/// The image-mapped plane that is built locally instead of loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationSetup {
    pub name: String,
    pub texture: String,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub opacity: f32,
}

impl Default for DecorationSetup {
    fn default() -> Self {
        Self {
            name: "decoration".into(),
            texture: "img/KTM(rev).png".into(),
            width: 240.0,
            height: 240.0,
            transform: Transform::from_position(Vec3::new(50.0, 131.0, -42.0))
                .with_rotation(Vec3::new(0.0, 1.5, 0.0)),
            opacity: 0.0,
        }
    }
}

/// Which models to load, in order, and how each one is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub models: Vec<ModelSetup>,
    #[serde(default)]
    pub decoration: DecorationSetup,
}

impl Default for AssetManifest {
    fn default() -> Self {
        let frame_one = Transform::from_position(Vec3::new(-270.0, 65.0, -270.0))
            .with_rotation(Vec3::new(0.0, 2.2, 0.0))
            .with_scale(Vec3::splat(10.0));
        let frame_two = Transform::from_position(Vec3::new(0.0, 65.0, 0.0))
            .with_rotation(Vec3::new(0.0, 1.66, 0.0))
            .with_scale(Vec3::splat(10.0));
        Self {
            models: vec![
                ModelSetup::new("Protorq Extreme HF").at(frame_one).spinning(),
                ModelSetup::new("Remora").at(frame_two),
                ModelSetup::new("IT30"),
                ModelSetup::new("Pancer Poly X"),
                ModelSetup::new("Jumbo XT"),
                ModelSetup::new("Jumbo XT(wireframe)"),
                ModelSetup::new("Protorq sport BF"),
                ModelSetup::new("EL18"),
                ModelSetup::new("TR18"),
                ModelSetup::new("Globe"),
            ],
            decoration: DecorationSetup::default(),
        }
    }
}

impl AssetManifest {
    /// Manifest for the given names, all at the default transform.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            models: names.into_iter().map(ModelSetup::new).collect(),
            decoration: DecorationSetup::default(),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }

    /// Save the manifest to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a manifest from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let manifest: Self = serde_json::from_reader(file)?;
        if manifest.models.is_empty() {
            return Err(AssetError::EmptyManifest);
        }
        Ok(manifest)
    }
}

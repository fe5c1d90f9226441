use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use showreel_common::{Color, EntityId, MaterialState, Transform};

use crate::camera::Camera;

/// What an entity is. The renderer decides how each kind is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A node resolved from a named model resource.
    Model { resource: String },
    /// Image-mapped plane built locally rather than by the model loader.
    Decoration {
        texture: String,
        width: f32,
        height: f32,
    },
    Ground { size: f32 },
    HemisphereLight { sky: Color, ground: Color },
    DirectionalLight { color: Color },
    Grid { size: f32, divisions: u32 },
}

/// A renderable entity as stored in the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    pub name: String,
    pub kind: EntityKind,
    pub transform: Transform,
    /// `None` for entities without a material (lights).
    pub material: Option<MaterialState>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl SceneEntity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: Transform::default(),
            material: None,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_material(mut self, material: MaterialState) -> Self {
        self.material = Some(material);
        self
    }

    pub fn casting_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    pub fn receiving_shadow(mut self) -> Self {
        self.receive_shadow = true;
        self
    }

    /// Current opacity; entities without a material count as fully opaque.
    pub fn opacity(&self) -> f32 {
        self.material.map_or(1.0, |m| m.opacity)
    }
}

/// An event record produced by mutations made through the store API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    Added { id: EntityId, name: String },
    TransformUpdated {
        id: EntityId,
        old: Transform,
        new: Transform,
    },
    OpacityUpdated { id: EntityId, old: f32, new: f32 },
    BackgroundChanged { old: Color, new: Color },
    CameraMoved { old: Vec3, new: Vec3 },
}

/// Errors from scene lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("no entity named {0:?} in the scene")]
    MissingEntity(String),
    #[error("entity {0:?} not found")]
    UnknownId(EntityId),
    #[error("entity {0:?} has no material")]
    NoMaterial(String),
}

/// The scene graph store.
///
/// Entities persist for the whole session and render in insertion order.
/// Scripts hold `EntityId` handles (or resolve them by name) so nothing
/// depends on where an entity sits in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneGraph {
    order: Vec<EntityId>,
    entities: BTreeMap<EntityId, SceneEntity>,
    names: BTreeMap<String, EntityId>,
    camera: Camera,
    background: Color,
    #[serde(skip)]
    event_log: Vec<SceneEvent>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entities: BTreeMap::new(),
            names: BTreeMap::new(),
            camera: Camera::default(),
            background: Color::WHITE,
            event_log: Vec::new(),
        }
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(camera: Camera) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insert an entity and return its handle.
    ///
    /// Names are indexed for lookup; when two entities share a name the
    /// first one keeps it.
    pub fn add(&mut self, entity: SceneEntity) -> EntityId {
        let id = EntityId::new();
        tracing::debug!(id = %id.short(), name = %entity.name, "entity added");
        self.names.entry(entity.name.clone()).or_insert(id);
        self.event_log.push(SceneEvent::Added {
            id,
            name: entity.name.clone(),
        });
        self.order.push(id);
        self.entities.insert(id, entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&SceneEntity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut SceneEntity> {
        self.entities.get_mut(&id)
    }

    /// Like `get`, but a missing id is an error.
    pub fn entity(&self, id: EntityId) -> Result<&SceneEntity, SceneError> {
        self.entities.get(&id).ok_or(SceneError::UnknownId(id))
    }

    /// Resolve an entity handle by name.
    pub fn find(&self, name: &str) -> Result<EntityId, SceneError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::MissingEntity(name.to_string()))
    }

    /// Handle of the entity at a render position.
    pub fn id_at(&self, index: usize) -> Option<EntityId> {
        self.order.get(index).copied()
    }

    /// All entities in insertion (render) order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &SceneEntity)> {
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id).map(|e| (*id, e)))
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        let old = self.background;
        self.background = color;
        self.event_log
            .push(SceneEvent::BackgroundChanged { old, new: color });
    }

    /// Point the camera at `target` and log the change.
    pub fn set_camera_target(&mut self, target: Vec3) {
        let old = self.camera.target;
        self.camera.look_at(target);
        self.event_log.push(SceneEvent::CameraMoved { old, new: target });
    }

    /// Replace an entity's transform and log the change.
    pub fn set_transform(&mut self, id: EntityId, new: Transform) -> Result<(), SceneError> {
        let entity = self.entities.get_mut(&id).ok_or(SceneError::UnknownId(id))?;
        let old = entity.transform;
        entity.transform = new;
        self.event_log
            .push(SceneEvent::TransformUpdated { id, old, new });
        Ok(())
    }

    /// Set an entity's material opacity, clamped to [0, 1].
    pub fn set_opacity(&mut self, id: EntityId, opacity: f32) -> Result<(), SceneError> {
        let entity = self.entities.get_mut(&id).ok_or(SceneError::UnknownId(id))?;
        let material = entity
            .material
            .as_mut()
            .ok_or_else(|| SceneError::NoMaterial(entity.name.clone()))?;
        let old = material.opacity;
        material.opacity = opacity.clamp(0.0, 1.0);
        let new = material.opacity;
        self.event_log
            .push(SceneEvent::OpacityUpdated { id, old, new });
        Ok(())
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    /// Deterministic hash of everything the renderer sees, in render order.
    ///
    /// Entity ids are random per session, so they are left out; two scenes
    /// built and animated the same way hash the same.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (_, entity) in self.iter() {
            mix(&mut h, entity.name.as_bytes());
            let t = entity.transform;
            for v in [t.position, t.rotation, t.scale] {
                mix(&mut h, &v.x.to_le_bytes());
                mix(&mut h, &v.y.to_le_bytes());
                mix(&mut h, &v.z.to_le_bytes());
            }
            mix(&mut h, &entity.opacity().to_le_bytes());
        }
        mix(&mut h, &self.camera.target.x.to_le_bytes());
        mix(&mut h, &self.camera.target.y.to_le_bytes());
        mix(&mut h, &self.camera.target.z.to_le_bytes());
        mix(&mut h, &self.background.0.to_le_bytes());
        h
    }
}

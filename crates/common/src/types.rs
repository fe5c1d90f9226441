use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable handle for an entity in the scene graph, assigned at insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spatial transform: position, XYZ Euler rotation in radians, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

/// Material state the presentation animates: opacity and whether blending is on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialState {
    pub opacity: f32,
    pub transparent: bool,
}

impl MaterialState {
    pub fn opaque() -> Self {
        Self {
            opacity: 1.0,
            transparent: false,
        }
    }

    /// Transparent material at the given opacity, clamped to [0, 1].
    pub fn transparent(opacity: f32) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
            transparent: true,
        }
    }
}

impl Default for MaterialState {
    fn default() -> Self {
        Self::opaque()
    }
}

/// 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xffffff);

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0 & 0xff_ffff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn entity_id_short_is_eight_chars() {
        assert_eq!(EntityId::new().short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn transform_builders() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Vec3::new(0.0, 2.2, 0.0))
            .with_scale(Vec3::splat(10.0));
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation.y, 2.2);
        assert_eq!(t.scale, Vec3::splat(10.0));
    }

    #[test]
    fn transparent_material_clamps() {
        assert_eq!(MaterialState::transparent(1.5).opacity, 1.0);
        assert_eq!(MaterialState::transparent(-0.5).opacity, 0.0);
        assert!(MaterialState::transparent(0.3).transparent);
    }

    #[test]
    fn color_round_trips_through_rgb() {
        let c = Color::from_rgb(0x99, 0x44, 0x12);
        assert_eq!(c.rgb(), (0x99, 0x44, 0x12));
        assert_eq!(c.to_string(), "#994412");
        assert_eq!(Color::BLACK.to_string(), "#000000");
    }
}

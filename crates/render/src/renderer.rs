use showreel_scene::{Camera, EntityKind, SceneGraph};
use std::fmt::Write;

/// Output surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene graph and a camera, then produces output.
/// It never mutates the scene; the presentation owns it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen from `camera`.
    fn render(&self, scene: &SceneGraph, camera: &Camera) -> Self::Output;

    /// The display surface changed size.
    fn resize(&mut self, viewport: Viewport);
}

/// Text renderer for headless runs.
///
/// Produces a human-readable dump of everything a frame would draw.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    viewport: Viewport,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

fn kind_label(kind: &EntityKind) -> &'static str {
    match kind {
        EntityKind::Model { .. } => "model",
        EntityKind::Decoration { .. } => "decoration",
        EntityKind::Ground { .. } => "ground",
        EntityKind::HemisphereLight { .. } => "hemi-light",
        EntityKind::DirectionalLight { .. } => "dir-light",
        EntityKind::Grid { .. } => "grid",
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph, camera: &Camera) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {}x{} background={} ===",
            self.viewport.width,
            self.viewport.height,
            scene.background()
        );
        let _ = writeln!(out, "Entities: {}", scene.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov_degrees,
            camera.aspect
        );

        for (id, entity) in scene.iter() {
            let p = entity.transform.position;
            let r = entity.transform.rotation;
            let _ = write!(
                out,
                "  [{}] {:<10} {:<20} pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3})",
                id.short(),
                kind_label(&entity.kind),
                entity.name,
                p.x,
                p.y,
                p.z,
                r.x,
                r.y,
                r.z
            );
            if let Some(material) = entity.material {
                let _ = write!(out, " opacity={:.2}", material.opacity);
            }
            out.push('\n');
        }

        out
    }

    fn resize(&mut self, viewport: Viewport) {
        tracing::debug!(width = viewport.width, height = viewport.height, "renderer resized");
        self.viewport = viewport;
    }
}

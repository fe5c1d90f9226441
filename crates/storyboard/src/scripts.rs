//! The presentation's slide content.
//!
//! Each script knows exactly which cast members it moves and by how much.

use glam::Vec3;
use showreel_animation::{Easing, Fields, Tween, TweenPlayer};
use showreel_common::{Color, EntityId};
use showreel_scene::SceneError;

use crate::StoryboardError;
use crate::controller::Storyboard;
use crate::stage::{Stage, TweenRole};

/// Where the lead model comes to rest after the intro glide.
pub const LEAD_REST_POSITION: Vec3 = Vec3::new(0.0, 65.0, 0.0);
pub const INTRO_DELAY_MS: f64 = 100.0;
pub const GLIDE_MS: f64 = 1000.0;
pub const REVEAL_MS: f64 = 500.0;
pub const TURN_MS: f64 = 3000.0;
pub const FADE_MS: f64 = 500.0;
/// Lead model yaw at the end of slide 0 → 1.
pub const LEAD_TURN_Y: f64 = 1.66;
/// Camera look-at z at the end of slide 0 → 1.
pub const LOOK_AT_Z: f64 = 0.0;

/// The two-slide presentation: intro, opening → lineup, terminal lineup.
pub fn default_storyboard() -> Storyboard {
    Storyboard::new()
        .intro(intro)
        .slide("opening", opening_to_lineup)
        .terminal("lineup")
}

/// Glide the lead (and its companion) to centre stage, then reveal the decoration.
pub fn intro(stage: &mut Stage, player: &mut TweenPlayer<Stage>) -> Result<(), StoryboardError> {
    let cast = stage.cast;
    let from = stage.scene.entity(cast.lead)?.transform.position;

    let glide = Tween::new(Fields::vec3(from))
        .to(Fields::vec3(LEAD_REST_POSITION), GLIDE_MS)
        .delay(INTRO_DELAY_MS)
        .easing(Easing::QuinticOut)
        .label("intro glide")
        .on_update(move |stage: &mut Stage, values: &Fields| {
            for id in [cast.lead, cast.companion] {
                let moved = stage.scene.entity(id).map(|e| e.transform).and_then(|mut t| {
                    t.position = values.to_vec3_or(t.position);
                    stage.scene.set_transform(id, t)
                });
                if let Err(e) = moved {
                    tracing::warn!(error = %e, "glide update skipped");
                }
            }
        })
        .on_complete(move |stage: &mut Stage, player: &mut TweenPlayer<Stage>| {
            let reveal = fade(stage, cast.decoration, 1.0, REVEAL_MS, "decoration reveal")
                .map(|tween| stage.track(TweenRole::Primary, tween))
                .map_err(StoryboardError::from)
                .and_then(|tween| player.start(tween).map_err(StoryboardError::from));
            if let Err(e) = reveal {
                tracing::error!(error = %e, "could not start decoration reveal");
            }
        });

    player.start(stage.track(TweenRole::Secondary, glide))?;
    Ok(())
}

/// Slide 0 → 1: pan the camera down, turn the lead, fade the decoration
/// and ground, switch to a black background.
pub fn opening_to_lineup(
    stage: &mut Stage,
    player: &mut TweenPlayer<Stage>,
) -> Result<(), StoryboardError> {
    let cast = stage.cast;

    let look_z = stage.scene.camera().target.z as f64;
    let pan = Tween::new(Fields::new().with("z", look_z))
        .to(Fields::new().with("z", LOOK_AT_Z), TURN_MS)
        .easing(Easing::QuinticOut)
        .label("camera pan")
        .on_update(|stage: &mut Stage, values: &Fields| {
            let target = values.to_vec3_or(stage.scene.camera().target);
            stage.scene.set_camera_target(target);
        });
    player.start(stage.track(TweenRole::Secondary, pan))?;

    let yaw = stage.scene.entity(cast.lead)?.transform.rotation.y as f64;
    let turn = Tween::new(Fields::new().with("y", yaw))
        .to(Fields::new().with("y", LEAD_TURN_Y), TURN_MS)
        .easing(Easing::QuinticOut)
        .label("lead turn")
        .on_update(move |stage: &mut Stage, values: &Fields| {
            let Some(y) = values.get("y") else { return };
            let turned = stage.scene.entity(cast.lead).map(|e| e.transform).and_then(|mut t| {
                t.rotation.y = y as f32;
                stage.scene.set_transform(cast.lead, t)
            });
            if let Err(e) = turned {
                tracing::warn!(error = %e, "turn update skipped");
            }
        });
    player.start(stage.track(TweenRole::Primary, turn))?;

    for (id, label) in [
        (cast.decoration, "decoration fade"),
        (cast.ground, "ground fade"),
    ] {
        let tween = fade(stage, id, 0.0, FADE_MS, label)?;
        player.start(stage.track(TweenRole::Secondary, tween))?;
    }

    stage.scene.set_background(Color::BLACK);
    Ok(())
}

/// Linear opacity tween from the entity's current opacity.
fn fade(
    stage: &Stage,
    id: EntityId,
    to: f64,
    duration_ms: f64,
    label: &str,
) -> Result<Tween<Stage>, SceneError> {
    let entity = stage.scene.entity(id)?;
    let from = entity
        .material
        .ok_or_else(|| SceneError::NoMaterial(entity.name.clone()))?
        .opacity as f64;
    Ok(Tween::new(Fields::new().with("opacity", from))
        .to(Fields::new().with("opacity", to), duration_ms)
        .label(label)
        .on_update(move |stage: &mut Stage, values: &Fields| {
            if let Some(opacity) = values.get("opacity") {
                if let Err(e) = stage.scene.set_opacity(id, opacity as f32) {
                    tracing::warn!(error = %e, "opacity update skipped");
                }
            }
        }))
}

use serde::{Deserialize, Serialize};
use showreel_animation::TweenPlayer;
use showreel_assets::{AssetLoader, add_environment, populate, resolve_blocking};
use showreel_common::EntityId;
use showreel_input::{Debouncer, ScrollDirection, WheelDelta};
use showreel_render::{Renderer, Viewport};
use showreel_scene::SceneGraph;
use showreel_storyboard::scripts::default_storyboard;
use showreel_storyboard::{Cast, Stage, Storyboard, StoryboardController, TriggerOutcome};
use std::time::Instant;

use crate::PresentationError;
use crate::config::PresentationManifest;
use crate::frame::{FrameLoop, FrameStats};

/// Signals emitted to the host as the presentation comes up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// Every model resolved and the scene is populated.
    AssetsReady,
    /// The intro animation is playing and slide 0 is current.
    IntroStarted,
    Failed { reason: String },
}

#[derive(Debug)]
enum Phase {
    Loading,
    Ready(Box<Stage>),
    Failed,
}

/// One presentation session.
///
/// Created in the loading phase; [`Presentation::boot`] resolves assets,
/// builds the scene and starts the intro. The host then calls
/// [`Presentation::poll_input`] and [`Presentation::tick`] once per display
/// refresh, and forwards wheel and resize notifications.
pub struct Presentation {
    manifest: PresentationManifest,
    phase: Phase,
    player: TweenPlayer<Stage>,
    controller: StoryboardController,
    frames: FrameLoop,
    debouncer: Debouncer<ScrollDirection>,
    spinning: Option<EntityId>,
    stats: FrameStats,
    events: Vec<LifecycleEvent>,
}

impl Presentation {
    /// A presentation playing the built-in storyboard.
    pub fn new(manifest: PresentationManifest) -> Self {
        Self::with_storyboard(manifest, default_storyboard())
    }

    pub fn with_storyboard(manifest: PresentationManifest, storyboard: Storyboard) -> Self {
        let frames = FrameLoop::new(manifest.frame.spin_rate);
        let debouncer = Debouncer::new(manifest.frame.debounce_ms);
        Self {
            manifest,
            phase: Phase::Loading,
            player: TweenPlayer::new(),
            controller: StoryboardController::new(storyboard),
            frames,
            debouncer,
            spinning: None,
            stats: FrameStats::default(),
            events: Vec::new(),
        }
    }

    /// Resolve assets, populate the scene, play the intro and start the frame loop.
    ///
    /// `now_ms` is the host clock at boot; the intro is scheduled from it.
    /// On failure `LifecycleEvent::Failed` is emitted and the presentation
    /// stays inert.
    pub fn boot<L: AssetLoader>(
        &mut self,
        loader: &L,
        now_ms: f64,
    ) -> Result<(), PresentationError> {
        if !matches!(self.phase, Phase::Loading) {
            return Err(PresentationError::AlreadyBooted);
        }
        let _span = tracing::info_span!("boot").entered();
        match self.try_boot(loader, now_ms) {
            Ok(stage) => {
                self.phase = Phase::Ready(stage);
                self.frames.start();
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "boot failed");
                self.player.cancel_all();
                self.phase = Phase::Failed;
                self.events.push(LifecycleEvent::Failed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn try_boot<L: AssetLoader>(
        &mut self,
        loader: &L,
        now_ms: f64,
    ) -> Result<Box<Stage>, PresentationError> {
        let nodes = resolve_blocking(loader, &self.manifest.assets)?;

        let mut scene = SceneGraph::with_camera(self.manifest.camera);
        let placement = populate(&mut scene, &self.manifest.assets, &nodes)?;
        add_environment(&mut scene);
        let cast = Cast::resolve(&scene, &self.manifest.cast)?;
        self.spinning = placement.spinning;

        let mut stage = Box::new(Stage::new(scene, cast, self.manifest.frame.busy_policy));
        tracing::info!(entities = stage.scene.len(), "assets ready");
        self.events.push(LifecycleEvent::AssetsReady);

        // Sync the tween clock to the host before scheduling the intro.
        self.player.advance(now_ms, &mut stage);
        self.controller.enter(&mut stage, &mut self.player)?;
        self.events.push(LifecycleEvent::IntroStarted);
        Ok(stage)
    }

    /// Feed one directional trigger straight to the storyboard.
    pub fn on_scroll(
        &mut self,
        direction: ScrollDirection,
    ) -> Result<TriggerOutcome, PresentationError> {
        let Phase::Ready(stage) = &mut self.phase else {
            tracing::debug!(?direction, "trigger before ready ignored");
            return Ok(TriggerOutcome::NotReady);
        };
        Ok(self.controller.on_scroll(direction, stage, &mut self.player)?)
    }

    /// Queue a raw wheel sample; bursts collapse to the last one.
    pub fn on_wheel(&mut self, delta: WheelDelta, now_ms: f64) {
        self.debouncer.push(delta.direction(), now_ms);
    }

    /// Deliver the debounced wheel trigger once its quiet period has passed.
    pub fn poll_input(
        &mut self,
        now_ms: f64,
    ) -> Result<Option<TriggerOutcome>, PresentationError> {
        match self.debouncer.poll(now_ms) {
            Some(direction) => self.on_scroll(direction).map(Some),
            None => Ok(None),
        }
    }

    /// Advance tweens, spin, and render one frame.
    ///
    /// Returns `None` while the frame loop is stopped or the presentation
    /// is not ready.
    pub fn tick<R: Renderer>(
        &mut self,
        now_ms: f64,
        renderer: &R,
    ) -> Result<Option<R::Output>, PresentationError> {
        let Phase::Ready(stage) = &mut self.phase else {
            return Ok(None);
        };
        if !self.frames.is_running() {
            return Ok(None);
        }
        let _span = tracing::trace_span!("tick", frame = self.frames.ticks()).entered();
        let started = Instant::now();

        self.player.advance(now_ms, stage);
        self.frames.step(&mut stage.scene, self.spinning)?;
        let output = renderer.render(&stage.scene, stage.scene.camera());

        let changes = stage.scene.drain_events();
        tracing::trace!(now_ms, changes = changes.len(), "frame rendered");
        self.stats.record(started.elapsed(), changes.len());
        Ok(Some(output))
    }

    /// Recompute the camera aspect and resize the renderer's output.
    pub fn resize<R: Renderer>(&mut self, viewport: Viewport, renderer: &mut R) {
        let camera = match &mut self.phase {
            Phase::Ready(stage) => stage.scene.camera_mut(),
            _ => &mut self.manifest.camera,
        };
        camera.set_viewport(viewport.width, viewport.height);
        renderer.resize(viewport);
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
    }

    pub fn start(&mut self) {
        if matches!(self.phase, Phase::Ready(_)) {
            self.frames.start();
        }
    }

    pub fn stop(&mut self) {
        self.frames.stop();
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.phase, Phase::Failed)
    }

    /// Current slide index.
    pub fn slide(&self) -> usize {
        self.controller.slide()
    }

    pub fn slide_name(&self) -> Option<&str> {
        self.controller.storyboard().slide_name(self.controller.slide())
    }

    pub fn is_busy(&self) -> bool {
        self.stage().is_some_and(Stage::is_busy)
    }

    pub fn stage(&self) -> Option<&Stage> {
        match &self.phase {
            Phase::Ready(stage) => Some(&**stage),
            _ => None,
        }
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.stage().map(|stage| &stage.scene)
    }

    pub fn spinning(&self) -> Option<EntityId> {
        self.spinning
    }

    pub fn manifest(&self) -> &PresentationManifest {
        &self.manifest
    }

    pub fn frames(&self) -> &FrameLoop {
        &self.frames
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn active_tweens(&self) -> usize {
        self.player.len()
    }

    /// Drain and return the lifecycle events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }
}

impl std::fmt::Debug for Presentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presentation")
            .field("phase", &self.phase)
            .field("slide", &self.controller.slide())
            .field("frames", &self.frames)
            .field("active_tweens", &self.player.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showreel_assets::{AssetManifest, StaticAssetLoader};
    use showreel_render::DebugTextRenderer;

    fn booted() -> Presentation {
        let mut p = Presentation::new(PresentationManifest::default());
        p.boot(&StaticAssetLoader::new(), 0.0).unwrap();
        p
    }

    #[test]
    fn boot_emits_ready_then_intro() {
        let mut p = booted();
        assert_eq!(
            p.drain_events(),
            vec![LifecycleEvent::AssetsReady, LifecycleEvent::IntroStarted]
        );
        assert!(p.drain_events().is_empty());
        assert!(p.is_ready());
        assert!(p.is_running());
        assert_eq!(p.slide(), 0);
        assert_eq!(p.slide_name(), Some("opening"));
    }

    #[test]
    fn scene_follows_render_order() {
        let p = booted();
        let names: Vec<&str> = p.scene().unwrap().iter().map(|(_, e)| e.name.as_str()).collect();
        assert_eq!(names.len(), 10 + 1 + 4);
        assert_eq!(names[0], "Protorq Extreme HF");
        assert_eq!(names[1], "decoration");
        assert_eq!(names[2], "Remora");
        assert_eq!(&names[11..], ["ground", "hemisphere light", "directional light", "grid"]);
        let first = p.scene().unwrap().id_at(0);
        assert_eq!(p.spinning(), first);
    }

    #[test]
    fn second_boot_is_rejected() {
        let mut p = booted();
        assert!(matches!(
            p.boot(&StaticAssetLoader::new(), 0.0),
            Err(PresentationError::AlreadyBooted)
        ));
    }

    #[test]
    fn failed_boot_emits_failed_and_stays_inert() {
        let mut p = Presentation::new(PresentationManifest::default());
        let loader = StaticAssetLoader::new().failing("Globe");
        let err = p.boot(&loader, 0.0).unwrap_err();
        assert!(err.to_string().contains("Globe"));

        let events = p.drain_events();
        assert_eq!(events.len(), 1);
        assert!(
            matches!(&events[0], LifecycleEvent::Failed { reason } if reason.contains("Globe"))
        );
        assert!(p.is_failed());
        assert!(!p.is_running());
        assert_eq!(p.on_scroll(ScrollDirection::Forward).unwrap(), TriggerOutcome::NotReady);
        assert!(p.tick(16.0, &DebugTextRenderer::new()).unwrap().is_none());
    }

    #[test]
    fn missing_cast_member_fails_boot() {
        let mut manifest = PresentationManifest::default();
        manifest.assets = AssetManifest::from_names(["Only"]);
        let mut p = Presentation::new(manifest);
        let err = p.boot(&StaticAssetLoader::new(), 0.0).unwrap_err();
        assert!(matches!(err, PresentationError::Scene(_)));
        assert!(matches!(p.events(), [LifecycleEvent::Failed { .. }]));
    }

    #[test]
    fn trigger_before_boot_is_not_ready() {
        let mut p = Presentation::new(PresentationManifest::default());
        assert_eq!(p.on_scroll(ScrollDirection::Forward).unwrap(), TriggerOutcome::NotReady);
        assert!(p.tick(0.0, &DebugTextRenderer::new()).unwrap().is_none());
    }

    #[test]
    fn tick_spins_first_model() {
        let mut p = booted();
        let renderer = DebugTextRenderer::new();
        for frame in 1..=4 {
            let out = p.tick(frame as f64 * 16.0, &renderer).unwrap();
            assert!(out.is_some());
        }
        let id = p.spinning().unwrap();
        let z = p.scene().unwrap().get(id).unwrap().transform.rotation.z;
        assert!((z - 0.06).abs() < 1e-6);
        assert_eq!(p.frames().ticks(), 4);
        assert_eq!(p.stats().frames(), 4);
        assert!(p.stats().last_changes() >= 1);
    }

    #[test]
    fn stopped_presentation_skips_frames() {
        let mut p = booted();
        let renderer = DebugTextRenderer::new();
        p.stop();
        assert!(p.tick(16.0, &renderer).unwrap().is_none());
        assert_eq!(p.frames().ticks(), 0);
        p.start();
        assert!(p.tick(32.0, &renderer).unwrap().is_some());
    }

    #[test]
    fn wheel_bursts_become_one_trigger() {
        let mut p = booted();
        let renderer = DebugTextRenderer::new();
        let mut now = 0.0;
        while now < 2000.0 {
            now += 16.0;
            p.tick(now, &renderer).unwrap();
        }
        assert!(!p.is_busy());

        for offset in [0.0, 20.0, 40.0] {
            p.on_wheel(WheelDelta::from_delta_y(120.0), now + offset);
        }
        assert_eq!(p.poll_input(now + 100.0).unwrap(), None);
        assert_eq!(
            p.poll_input(now + 140.0).unwrap(),
            Some(TriggerOutcome::Started { from: 0, to: 1 })
        );
        assert_eq!(p.poll_input(now + 300.0).unwrap(), None);
        assert_eq!(p.slide(), 1);
        assert!(p.is_busy());
    }

    #[test]
    fn upward_wheel_is_backward() {
        let mut p = booted();
        p.on_wheel(WheelDelta::legacy(120.0), 0.0);
        // Still inside the intro.
        assert_eq!(p.poll_input(100.0).unwrap(), Some(TriggerOutcome::Busy));

        let renderer = DebugTextRenderer::new();
        p.tick(2000.0, &renderer).unwrap();
        p.tick(2600.0, &renderer).unwrap();
        assert!(!p.is_busy());
        p.on_wheel(WheelDelta::legacy(120.0), 2600.0);
        assert_eq!(p.poll_input(2700.0).unwrap(), Some(TriggerOutcome::Backward));
        assert_eq!(p.slide(), 0);
    }

    #[test]
    fn resize_updates_camera_and_renderer() {
        let mut p = booted();
        let mut renderer = DebugTextRenderer::new();
        p.resize(Viewport::new(1000, 500), &mut renderer);
        assert_eq!(p.scene().unwrap().camera().aspect, 2.0);
        assert_eq!(renderer.viewport(), Viewport::new(1000, 500));
    }

    #[test]
    fn resize_before_boot_carries_into_scene() {
        let mut p = Presentation::new(PresentationManifest::default());
        let mut renderer = DebugTextRenderer::new();
        p.resize(Viewport::new(400, 400), &mut renderer);
        p.boot(&StaticAssetLoader::new(), 0.0).unwrap();
        assert_eq!(p.scene().unwrap().camera().aspect, 1.0);
    }
}

use showreel_common::EntityId;
use showreel_scene::{SceneError, SceneGraph};
use std::collections::VecDeque;
use std::time::Duration;

/// Start/stop switch for the per-tick work, plus the idle spin.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    running: bool,
    spin_rate: f32,
    ticks: u64,
}

impl FrameLoop {
    pub fn new(spin_rate: f32) -> Self {
        Self {
            running: false,
            spin_rate,
            ticks: 0,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            tracing::info!("frame loop started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            tracing::info!(ticks = self.ticks, "frame loop stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks run since the loop was created.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn spin_rate(&self) -> f32 {
        self.spin_rate
    }

    /// Count one tick and rotate `spinning` about z. Does nothing when stopped.
    pub(crate) fn step(
        &mut self,
        scene: &mut SceneGraph,
        spinning: Option<EntityId>,
    ) -> Result<bool, SceneError> {
        if !self.running {
            return Ok(false);
        }
        self.ticks += 1;
        if let Some(id) = spinning {
            let mut transform = scene.entity(id)?.transform;
            transform.rotation.z += self.spin_rate;
            scene.set_transform(id, transform)?;
        }
        Ok(true)
    }
}

/// One rendered frame: how long the tick took and how many scene changes it flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameSample {
    elapsed: Duration,
    changes: usize,
}

/// Rolling per-frame statistics for the debug summary.
///
/// Keeps the most recent `window` samples; `frames` counts every frame ever
/// recorded.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: usize,
    samples: VecDeque<FrameSample>,
    frames: u64,
}

impl FrameStats {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: VecDeque::with_capacity(window),
            frames: 0,
        }
    }

    pub fn record(&mut self, elapsed: Duration, changes: usize) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(FrameSample { elapsed, changes });
        self.frames += 1;
    }

    /// Frames recorded since creation, including those that left the window.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Mean tick time over the window.
    pub fn average(&self) -> Duration {
        match u32::try_from(self.samples.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.samples.iter().map(|s| s.elapsed).sum::<Duration>() / n,
        }
    }

    /// Slowest tick in the window.
    pub fn worst(&self) -> Duration {
        self.samples
            .iter()
            .map(|s| s.elapsed)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Scene changes flushed by the latest frame.
    pub fn last_changes(&self) -> usize {
        self.samples.back().map_or(0, |s| s.changes)
    }

    /// Frames in the window that changed nothing.
    pub fn idle_frames(&self) -> usize {
        self.samples.iter().filter(|s| s.changes == 0).count()
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showreel_scene::{EntityKind, SceneEntity};

    fn scene_with_globe() -> (SceneGraph, EntityId) {
        let mut scene = SceneGraph::new();
        let id = scene.add(SceneEntity::new(
            "Globe",
            EntityKind::Model {
                resource: "Globe".into(),
            },
        ));
        (scene, id)
    }

    #[test]
    fn stopped_loop_does_nothing() {
        let (mut scene, id) = scene_with_globe();
        let mut frames = FrameLoop::new(0.015);
        assert!(!frames.step(&mut scene, Some(id)).unwrap());
        assert_eq!(frames.ticks(), 0);
        assert_eq!(scene.get(id).unwrap().transform.rotation.z, 0.0);
    }

    #[test]
    fn running_loop_spins_about_z() {
        let (mut scene, id) = scene_with_globe();
        let mut frames = FrameLoop::new(0.015);
        frames.start();
        for _ in 0..3 {
            assert!(frames.step(&mut scene, Some(id)).unwrap());
        }
        let rotation = scene.get(id).unwrap().transform.rotation;
        assert!((rotation.z - 0.045).abs() < 1e-6);
        assert_eq!(rotation.x, 0.0);
        assert_eq!(rotation.y, 0.0);
        assert_eq!(frames.ticks(), 3);

        frames.stop();
        frames.step(&mut scene, Some(id)).unwrap();
        assert_eq!(frames.ticks(), 3);
    }

    #[test]
    fn unknown_spinning_entity_is_an_error() {
        let (mut scene, _) = scene_with_globe();
        let mut frames = FrameLoop::new(0.015);
        frames.start();
        let stray = EntityId::new();
        assert_eq!(
            frames.step(&mut scene, Some(stray)),
            Err(SceneError::UnknownId(stray))
        );
    }

    #[test]
    fn stats_average_over_window() {
        let mut stats = FrameStats::new(3);
        stats.record(Duration::from_millis(10), 2);
        stats.record(Duration::from_millis(20), 0);
        stats.record(Duration::from_millis(30), 1);

        assert_eq!(stats.frames(), 3);
        assert_eq!(stats.average(), Duration::from_millis(20));
        assert_eq!(stats.worst(), Duration::from_millis(30));
        assert_eq!(stats.last_changes(), 1);
        assert_eq!(stats.idle_frames(), 1);
    }

    #[test]
    fn old_samples_leave_the_window() {
        let mut stats = FrameStats::new(2);
        stats.record(Duration::from_millis(40), 0);
        stats.record(Duration::from_millis(10), 3);
        stats.record(Duration::from_millis(20), 3);

        assert_eq!(stats.frames(), 3);
        assert_eq!(stats.average(), Duration::from_millis(15));
        assert_eq!(stats.worst(), Duration::from_millis(20));
        assert_eq!(stats.idle_frames(), 0);
    }

    #[test]
    fn empty_stats_report_zero() {
        let stats = FrameStats::default();
        assert_eq!(stats.frames(), 0);
        assert_eq!(stats.average(), Duration::ZERO);
        assert_eq!(stats.worst(), Duration::ZERO);
        assert_eq!(stats.last_changes(), 0);
    }
}

use serde::{Deserialize, Serialize};
use showreel_animation::Tween;
use showreel_common::EntityId;
use showreel_scene::{SceneError, SceneGraph};

/// When a running transition stops counting as busy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyPolicy {
    /// Busy clears when the primary tween completes, even if secondary
    /// tweens are still running.
    #[default]
    PrimaryTween,
    /// Busy clears once every tween the transition started, chained ones
    /// included, has completed.
    AllTweens,
}

/// How a tween counts towards the busy guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenRole {
    Primary,
    Secondary,
}

/// Re-entrancy guard for storyboard transitions.
#[derive(Debug, Clone, Default)]
pub struct TransitionState {
    policy: BusyPolicy,
    busy: bool,
    outstanding: usize,
    primaries: usize,
}

impl TransitionState {
    pub fn new(policy: BusyPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> BusyPolicy {
        self.policy
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Tracked tweens that have not completed yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub(crate) fn begin(&mut self) {
        self.busy = true;
        self.outstanding = 0;
        self.primaries = 0;
    }

    /// Clear busy if the script started nothing that could clear it later.
    pub(crate) fn settle_if_idle(&mut self) {
        if self.outstanding == 0 {
            self.busy = false;
        }
    }

    pub(crate) fn abort(&mut self) {
        self.busy = false;
        self.outstanding = 0;
        self.primaries = 0;
    }

    fn register(&mut self, role: TweenRole) {
        self.outstanding += 1;
        if role == TweenRole::Primary {
            self.primaries += 1;
        }
    }

    fn settle(&mut self, role: TweenRole) {
        self.outstanding = self.outstanding.saturating_sub(1);
        let clear = match self.policy {
            BusyPolicy::PrimaryTween => {
                role == TweenRole::Primary || (self.primaries == 0 && self.outstanding == 0)
            }
            BusyPolicy::AllTweens => self.outstanding == 0,
        };
        if clear && self.busy {
            tracing::debug!(policy = ?self.policy, "transition settled");
            self.busy = false;
        }
    }
}

/// Entity names the scripts animate, as configured in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastNames {
    /// The model that glides in during the intro and turns on slide 0 → 1.
    pub lead: String,
    /// Follows the lead's position during the intro.
    pub companion: String,
    pub decoration: String,
    pub ground: String,
}

impl Default for CastNames {
    fn default() -> Self {
        Self {
            lead: "Protorq Extreme HF".into(),
            companion: "Jumbo XT".into(),
            decoration: "decoration".into(),
            ground: "ground".into(),
        }
    }
}

/// Handles of the entities the scripts animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cast {
    pub lead: EntityId,
    pub companion: EntityId,
    pub decoration: EntityId,
    pub ground: EntityId,
}

impl Cast {
    pub fn resolve(scene: &SceneGraph, names: &CastNames) -> Result<Self, SceneError> {
        Ok(Self {
            lead: scene.find(&names.lead)?,
            companion: scene.find(&names.companion)?,
            decoration: scene.find(&names.decoration)?,
            ground: scene.find(&names.ground)?,
        })
    }
}

/// Everything a transition script and its tween callbacks may touch.
#[derive(Debug)]
pub struct Stage {
    pub scene: SceneGraph,
    pub cast: Cast,
    pub transition: TransitionState,
}

impl Stage {
    pub fn new(scene: SceneGraph, cast: Cast, policy: BusyPolicy) -> Self {
        Self {
            scene,
            cast,
            transition: TransitionState::new(policy),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.transition.is_busy()
    }

    /// Count `tween` towards the busy guard and release it on completion.
    ///
    /// The release runs after the tween's own completion callback, so a
    /// tween chained from that callback is registered before the count drops.
    pub fn track(&mut self, role: TweenRole, tween: Tween<Stage>) -> Tween<Stage> {
        self.transition.register(role);
        tween.after_complete(move |stage: &mut Stage, _| stage.transition.settle(role))
    }
}

use showreel_animation::TweenPlayer;
use showreel_input::ScrollDirection;

use crate::StoryboardError;
use crate::stage::Stage;

/// A transition script: starts the tweens that carry the presentation to
/// the next slide.
pub type SlideScript =
    Box<dyn Fn(&mut Stage, &mut TweenPlayer<Stage>) -> Result<(), StoryboardError>>;

/// One stage of the presentation.
pub struct Slide {
    pub name: String,
    /// Transition out of this slide. `None` marks a terminal slide.
    pub script: Option<SlideScript>,
}

/// Ordered slides plus the intro that enters slide 0.
#[derive(Default)]
pub struct Storyboard {
    intro: Option<SlideScript>,
    slides: Vec<Slide>,
}

impl Storyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intro<F>(mut self, script: F) -> Self
    where
        F: Fn(&mut Stage, &mut TweenPlayer<Stage>) -> Result<(), StoryboardError> + 'static,
    {
        self.intro = Some(Box::new(script));
        self
    }

    /// Append a slide whose transition leads to the next one.
    pub fn slide<F>(mut self, name: impl Into<String>, script: F) -> Self
    where
        F: Fn(&mut Stage, &mut TweenPlayer<Stage>) -> Result<(), StoryboardError> + 'static,
    {
        self.slides.push(Slide {
            name: name.into(),
            script: Some(Box::new(script)),
        });
        self
    }

    /// Append a slide with no outgoing transition.
    pub fn terminal(mut self, name: impl Into<String>) -> Self {
        self.slides.push(Slide {
            name: name.into(),
            script: None,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slide_name(&self, index: usize) -> Option<&str> {
        self.slides.get(index).map(|s| s.name.as_str())
    }
}

impl std::fmt::Debug for Storyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storyboard")
            .field("intro", &self.intro.is_some())
            .field(
                "slides",
                &self.slides.iter().map(|s| &s.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Why a trigger did or did not start a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started { from: usize, to: usize },
    /// A transition is still in flight; the trigger was dropped.
    Busy,
    /// No backward transitions exist.
    Backward,
    /// The current slide has no outgoing transition.
    Terminal,
    /// The intro has not run yet.
    NotReady,
}

/// Slide state machine.
#[derive(Debug)]
pub struct StoryboardController {
    storyboard: Storyboard,
    slide: usize,
    entered: bool,
}

impl StoryboardController {
    pub fn new(storyboard: Storyboard) -> Self {
        Self {
            storyboard,
            slide: 0,
            entered: false,
        }
    }

    /// Current slide index.
    pub fn slide(&self) -> usize {
        self.slide
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    pub fn storyboard(&self) -> &Storyboard {
        &self.storyboard
    }

    /// Whether the current slide has no outgoing transition.
    pub fn is_terminal(&self) -> bool {
        self.storyboard
            .slides
            .get(self.slide)
            .is_none_or(|s| s.script.is_none())
    }

    /// Enter slide 0 by playing the intro.
    pub fn enter(
        &mut self,
        stage: &mut Stage,
        player: &mut TweenPlayer<Stage>,
    ) -> Result<(), StoryboardError> {
        self.slide = 0;
        self.entered = true;
        tracing::info!(slide = 0, "entering storyboard");
        match &self.storyboard.intro {
            Some(intro) => run(intro, stage, player),
            None => Ok(()),
        }
    }

    /// React to one directional trigger.
    pub fn on_scroll(
        &mut self,
        direction: ScrollDirection,
        stage: &mut Stage,
        player: &mut TweenPlayer<Stage>,
    ) -> Result<TriggerOutcome, StoryboardError> {
        let outcome = if !self.entered {
            TriggerOutcome::NotReady
        } else if stage.is_busy() {
            TriggerOutcome::Busy
        } else if direction == ScrollDirection::Backward {
            TriggerOutcome::Backward
        } else {
            match self
                .storyboard
                .slides
                .get(self.slide)
                .and_then(|s| s.script.as_ref())
            {
                None => TriggerOutcome::Terminal,
                Some(script) => {
                    let from = self.slide;
                    run(script, stage, player)?;
                    self.slide += 1;
                    TriggerOutcome::Started {
                        from,
                        to: self.slide,
                    }
                }
            }
        };
        tracing::debug!(?direction, ?outcome, slide = self.slide, "scroll trigger");
        Ok(outcome)
    }
}

/// Pre-empt leftover tweens, raise the busy guard and run a script.
fn run(
    script: &SlideScript,
    stage: &mut Stage,
    player: &mut TweenPlayer<Stage>,
) -> Result<(), StoryboardError> {
    player.cancel_all();
    stage.transition.begin();
    match script(stage, player) {
        Ok(()) => {
            stage.transition.settle_if_idle();
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "transition script failed");
            player.cancel_all();
            stage.transition.abort();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{BusyPolicy, Cast, TweenRole};
    use showreel_animation::{Fields, Tween};
    use showreel_common::MaterialState;
    use showreel_scene::{EntityKind, SceneEntity, SceneGraph};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn stage() -> Stage {
        let mut scene = SceneGraph::new();
        let id = scene.add(
            SceneEntity::new("m", EntityKind::Model { resource: "m".into() })
                .with_material(MaterialState::opaque()),
        );
        let cast = Cast {
            lead: id,
            companion: id,
            decoration: id,
            ground: id,
        };
        Stage::new(scene, cast, BusyPolicy::PrimaryTween)
    }

    fn one_tween(
        stage: &mut Stage,
        player: &mut TweenPlayer<Stage>,
    ) -> Result<(), StoryboardError> {
        let t = Tween::new(Fields::new().with("x", 0.0)).to(Fields::new().with("x", 1.0), 100.0);
        player.start(stage.track(TweenRole::Primary, t))?;
        Ok(())
    }

    fn board() -> Storyboard {
        Storyboard::new()
            .slide("first", one_tween)
            .slide("second", one_tween)
            .terminal("last")
    }

    #[test]
    fn triggers_before_enter_are_not_ready() {
        let mut c = StoryboardController::new(board());
        let mut s = stage();
        let mut p = TweenPlayer::new();
        let out = c.on_scroll(ScrollDirection::Forward, &mut s, &mut p).unwrap();
        assert_eq!(out, TriggerOutcome::NotReady);
        assert!(p.is_empty());
    }

    #[test]
    fn forward_walks_slides_until_terminal() {
        let mut c = StoryboardController::new(board());
        let mut s = stage();
        let mut p = TweenPlayer::new();
        c.enter(&mut s, &mut p).unwrap();
        assert!(!s.is_busy());

        let out = c.on_scroll(ScrollDirection::Forward, &mut s, &mut p).unwrap();
        assert_eq!(out, TriggerOutcome::Started { from: 0, to: 1 });
        assert!(s.is_busy());

        // Busy: dropped, nothing new started.
        let out = c.on_scroll(ScrollDirection::Forward, &mut s, &mut p).unwrap();
        assert_eq!(out, TriggerOutcome::Busy);
        assert_eq!(c.slide(), 1);
        assert_eq!(p.len(), 1);

        p.advance(100.0, &mut s);
        assert!(!s.is_busy());

        let out = c.on_scroll(ScrollDirection::Forward, &mut s, &mut p).unwrap();
        assert_eq!(out, TriggerOutcome::Started { from: 1, to: 2 });
        p.advance(200.0, &mut s);

        assert!(c.is_terminal());
        let out = c.on_scroll(ScrollDirection::Forward, &mut s, &mut p).unwrap();
        assert_eq!(out, TriggerOutcome::Terminal);
        assert_eq!(c.slide(), 2);
        assert!(p.is_empty());
        assert!(!s.is_busy());
    }

    #[test]
    fn new_transition_drops_leftover_tweens_silently() {
        // Each run tags its tweens, and the long secondary reports every callback.
        let runs = Rc::new(Cell::new(0u32));
        let calls: Rc<RefCell<Vec<(u32, &'static str)>>> = Rc::default();
        let script = {
            let (runs, calls) = (runs.clone(), calls.clone());
            move |stage: &mut Stage,
                  player: &mut TweenPlayer<Stage>|
                  -> Result<(), StoryboardError> {
                runs.set(runs.get() + 1);
                let run = runs.get();
                let x = |v: f64| Fields::new().with("x", v);
                let quick = Tween::new(x(0.0)).to(x(1.0), 100.0);
                player.start(stage.track(TweenRole::Primary, quick))?;
                let (on_update, on_complete) = (calls.clone(), calls.clone());
                let slow = Tween::new(x(0.0))
                    .to(x(1.0), 1000.0)
                    .on_update(move |_: &mut Stage, _: &Fields| {
                        on_update.borrow_mut().push((run, "update"))
                    })
                    .on_complete(move |_: &mut Stage, _: &mut TweenPlayer<Stage>| {
                        on_complete.borrow_mut().push((run, "complete"))
                    });
                player.start(stage.track(TweenRole::Secondary, slow))?;
                Ok(())
            }
        };
        let board = Storyboard::new()
            .slide("first", script.clone())
            .slide("second", script)
            .terminal("last");

        let mut c = StoryboardController::new(board);
        let mut s = stage();
        let mut p = TweenPlayer::new();
        c.enter(&mut s, &mut p).unwrap();
        c.on_scroll(ScrollDirection::Forward, &mut s, &mut p).unwrap();
        p.advance(100.0, &mut s);
        assert!(!s.is_busy());
        assert_eq!(p.len(), 1);
        assert_eq!(s.transition.outstanding(), 1);

        let seen = calls.borrow().len();
        let out = c.on_scroll(ScrollDirection::Forward, &mut s, &mut p).unwrap();
        assert_eq!(out, TriggerOutcome::Started { from: 1, to: 2 });
        assert_eq!(p.len(), 2);
        assert_eq!(s.transition.outstanding(), 2);

        p.advance(5000.0, &mut s);
        let calls = calls.borrow();
        assert!(calls[seen..].iter().all(|(run, _)| *run == 2));
        assert!(!calls.contains(&(1, "complete")));
        assert!(calls.contains(&(2, "complete")));
        assert!(!s.is_busy());
    }

    #[test]
    fn backward_is_a_no_op() {
        let mut c = StoryboardController::new(board());
        let mut s = stage();
        let mut p = TweenPlayer::new();
        c.enter(&mut s, &mut p).unwrap();
        let out = c.on_scroll(ScrollDirection::Backward, &mut s, &mut p).unwrap();
        assert_eq!(out, TriggerOutcome::Backward);
        assert_eq!(c.slide(), 0);
        assert!(p.is_empty());
    }

    #[test]
    fn failing_script_releases_busy_and_keeps_slide() {
        let failing = |stage: &mut Stage,
                       _: &mut TweenPlayer<Stage>|
         -> Result<(), StoryboardError> {
            stage.scene.find("nobody")?;
            Ok(())
        };
        let board = Storyboard::new().slide("bad", failing).terminal("end");
        let mut c = StoryboardController::new(board);
        let mut s = stage();
        let mut p = TweenPlayer::new();
        c.enter(&mut s, &mut p).unwrap();
        assert!(c.on_scroll(ScrollDirection::Forward, &mut s, &mut p).is_err());
        assert_eq!(c.slide(), 0);
        assert!(!s.is_busy());
    }

    #[test]
    fn empty_storyboard_is_terminal() {
        let c = StoryboardController::new(Storyboard::new());
        assert!(c.is_terminal());
    }
}

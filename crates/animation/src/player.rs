use crate::tween::{Tween, TweenError};

/// Handle returned when a tween starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u64);

struct ActiveTween<C> {
    id: TweenId,
    /// Clock time at which interpolation begins (start time plus delay).
    begins_at: f64,
    tween: Tween<C>,
}

/// The animation clock: the set of running tweens, advanced once per frame.
///
/// Time is absolute milliseconds supplied by the caller. A tween's clock
/// starts at the player's current time, i.e. the `now` of the last
/// `advance` (0 before the first one).
pub struct TweenPlayer<C> {
    active: Vec<ActiveTween<C>>,
    now_ms: f64,
    next_id: u64,
    /// Bumped by every `cancel_all`, so an advance in progress can tell
    /// that a completion callback drained the set.
    generation: u64,
}

impl<C> Default for TweenPlayer<C> {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            now_ms: 0.0,
            next_id: 0,
            generation: 0,
        }
    }
}

impl<C> TweenPlayer<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time in milliseconds.
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Number of tweens running or waiting out their delay.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_active(&self, id: TweenId) -> bool {
        self.active.iter().any(|a| a.id == id)
    }

    /// Validate and start a tween.
    pub fn start(&mut self, tween: Tween<C>) -> Result<TweenId, TweenError> {
        tween.validate()?;
        let id = TweenId(self.next_id);
        self.next_id += 1;
        let begins_at = self.now_ms + tween.delay_ms;
        tracing::debug!(
            id = id.0,
            label = %tween.label,
            duration_ms = tween.duration_ms,
            begins_at,
            "tween started"
        );
        self.active.push(ActiveTween {
            id,
            begins_at,
            tween,
        });
        Ok(id)
    }

    /// Drop every active tween without firing any callback. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.active.len();
        self.active.clear();
        self.generation += 1;
        if dropped > 0 {
            tracing::debug!(dropped, "tweens cancelled");
        }
        dropped
    }

    /// Advance the clock to `now_ms` and step every active tween.
    ///
    /// Running tweens get `on_update` with their interpolated values.
    /// Finished tweens get a last `on_update` with their exact end values,
    /// leave the active set, then get `on_complete`. Tweens started from a
    /// completion callback begin at `now_ms` and are first stepped on the
    /// next advance. Returns the number of tweens that completed.
    pub fn advance(&mut self, now_ms: f64, ctx: &mut C) -> usize {
        self.now_ms = now_ms;
        let generation = self.generation;
        let mut kept = Vec::with_capacity(self.active.len());
        let mut completed = 0;

        for mut active in std::mem::take(&mut self.active) {
            if self.generation != generation {
                // A completion callback cancelled everything.
                break;
            }
            let elapsed = now_ms - active.begins_at;
            if elapsed < 0.0 {
                kept.push(active);
                continue;
            }
            let values = active.tween.sample(elapsed);
            if let Some(update) = active.tween.on_update.as_mut() {
                update(ctx, &values);
            }
            if elapsed >= active.tween.duration_ms {
                completed += 1;
                tracing::debug!(id = active.id.0, label = %active.tween.label, "tween completed");
                if let Some(done) = active.tween.on_complete.take() {
                    done(ctx, self);
                }
            } else {
                kept.push(active);
            }
        }

        if self.generation == generation {
            kept.append(&mut self.active);
            self.active = kept;
        }
        tracing::trace!(now_ms, active = self.active.len(), completed, "tweens advanced");
        completed
    }
}

impl<C> std::fmt::Debug for TweenPlayer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenPlayer")
            .field("active", &self.active.len())
            .field("now_ms", &self.now_ms)
            .finish()
    }
}

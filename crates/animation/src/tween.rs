use glam::Vec3;
use std::collections::BTreeMap;

use crate::easing::Easing;
use crate::player::TweenPlayer;

/// Per-tick callback receiving the interpolated values.
pub type UpdateFn<C> = Box<dyn FnMut(&mut C, &Fields)>;

/// Completion callback. Gets the player so it can chain further tweens.
pub type CompleteFn<C> = Box<dyn FnOnce(&mut C, &mut TweenPlayer<C>)>;

/// Errors from starting a tween.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TweenError {
    #[error("invalid tween subject {label:?}: {reason}")]
    InvalidTweenSubject { label: String, reason: String },
}

/// A set of named numeric fields: the subject of a tween.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(BTreeMap<&'static str, f64>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: f64) -> Self {
        self.0.insert(name, value);
        self
    }

    /// `x`, `y` and `z` fields from a vector.
    pub fn vec3(v: Vec3) -> Self {
        Self::new()
            .with("x", v.x as f64)
            .with("y", v.y as f64)
            .with("z", v.z as f64)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn set(&mut self, name: &'static str, value: f64) {
        self.0.insert(name, value);
    }

    /// Read `x`, `y`, `z` back, keeping components of `base` that are absent.
    pub fn to_vec3_or(&self, base: Vec3) -> Vec3 {
        Vec3::new(
            self.get("x").map_or(base.x, |v| v as f32),
            self.get("y").map_or(base.y, |v| v as f32),
            self.get("z").map_or(base.z, |v| v as f32),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Interpolate every field present in both `self` and `end`.
    ///
    /// Fields only present in `self` are carried through unchanged.
    pub(crate) fn lerp(&self, end: &Fields, t: f64) -> Fields {
        let mut out = self.clone();
        for (name, to) in end.iter() {
            if let Some(from) = self.0.get(name) {
                out.0.insert(name, from + (to - from) * t);
            }
        }
        out
    }

    /// End values for every shared field, exact rather than interpolated.
    pub(crate) fn snap(&self, end: &Fields) -> Fields {
        let mut out = self.clone();
        for (name, to) in end.iter() {
            if self.0.contains_key(name) {
                out.0.insert(name, to);
            }
        }
        out
    }
}

/// A one-shot animation from a start value to an end value.
///
/// Built with chained setters and handed to [`TweenPlayer::start`]. The
/// context type `C` is whatever the callbacks mutate.
pub struct Tween<C> {
    pub(crate) label: String,
    pub(crate) from: Fields,
    pub(crate) to: Fields,
    pub(crate) duration_ms: f64,
    pub(crate) delay_ms: f64,
    pub(crate) easing: Easing,
    pub(crate) on_update: Option<UpdateFn<C>>,
    pub(crate) on_complete: Option<CompleteFn<C>>,
}

impl<C> Tween<C> {
    pub fn new(from: Fields) -> Self {
        Self {
            label: String::from("tween"),
            from,
            to: Fields::new(),
            duration_ms: 0.0,
            delay_ms: 0.0,
            easing: Easing::Linear,
            on_update: None,
            on_complete: None,
        }
    }

    pub fn to(mut self, to: Fields, duration_ms: f64) -> Self {
        self.to = to;
        self.duration_ms = duration_ms;
        self
    }

    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Name used in log lines and errors.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn on_update<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut C, &Fields) + 'static,
    {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut C, &mut TweenPlayer<C>) + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Run `f` after whatever completion callback is already set.
    pub fn after_complete<F>(mut self, f: F) -> Self
    where
        C: 'static,
        F: FnOnce(&mut C, &mut TweenPlayer<C>) + 'static,
    {
        let previous = self.on_complete.take();
        self.on_complete = Some(Box::new(move |ctx: &mut C, player: &mut TweenPlayer<C>| {
            if let Some(previous) = previous {
                previous(ctx, player);
            }
            f(ctx, player);
        }));
        self
    }

    pub fn label_str(&self) -> &str {
        &self.label
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Values at `elapsed_ms` after the tween's start (delay excluded).
    pub fn sample(&self, elapsed_ms: f64) -> Fields {
        if elapsed_ms >= self.duration_ms {
            return self.from.snap(&self.to);
        }
        let fraction = if self.duration_ms > 0.0 {
            elapsed_ms / self.duration_ms
        } else {
            1.0
        };
        self.from.lerp(&self.to, self.easing.apply(fraction))
    }

    pub(crate) fn validate(&self) -> Result<(), TweenError> {
        let invalid = |reason: String| TweenError::InvalidTweenSubject {
            label: self.label.clone(),
            reason,
        };
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(invalid(format!("duration {} ms", self.duration_ms)));
        }
        if !self.delay_ms.is_finite() || self.delay_ms < 0.0 {
            return Err(invalid(format!("delay {} ms", self.delay_ms)));
        }
        if !self.to.iter().any(|(name, _)| self.from.get(name).is_some()) {
            return Err(invalid("start and end share no field".into()));
        }
        if let Some((name, _)) = self
            .from
            .iter()
            .chain(self.to.iter())
            .find(|(_, v)| !v.is_finite())
        {
            return Err(invalid(format!("field {name:?} is not finite")));
        }
        Ok(())
    }
}

impl<C> std::fmt::Debug for Tween<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("label", &self.label)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration_ms", &self.duration_ms)
            .field("delay_ms", &self.delay_ms)
            .field("easing", &self.easing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x(v: f64) -> Fields {
        Fields::new().with("x", v)
    }

    #[test]
    fn sample_matches_formula() {
        let tween: Tween<()> = Tween::new(x(2.0))
            .to(x(12.0), 800.0)
            .easing(Easing::QuinticOut);
        for e in [0.0, 100.0, 250.0, 400.0, 799.0] {
            let expected = 2.0 + (12.0 - 2.0) * Easing::QuinticOut.apply(e / 800.0);
            assert_eq!(tween.sample(e).get("x"), Some(expected));
        }
    }

    #[test]
    fn sample_at_zero_is_start_and_past_end_is_end() {
        let tween: Tween<()> = Tween::new(x(0.1)).to(x(0.7), 300.0);
        assert_eq!(tween.sample(0.0).get("x"), Some(0.1));
        assert_eq!(tween.sample(300.0).get("x"), Some(0.7));
        assert_eq!(tween.sample(10_000.0).get("x"), Some(0.7));
    }

    #[test]
    fn unshared_fields_pass_through() {
        let tween: Tween<()> =
            Tween::new(Fields::new().with("x", 0.0).with("y", 5.0)).to(x(10.0), 100.0);
        let mid = tween.sample(50.0);
        assert_eq!(mid.get("x"), Some(5.0));
        assert_eq!(mid.get("y"), Some(5.0));
    }

    #[test]
    fn vec3_round_trip_keeps_missing_components() {
        let f = Fields::new().with("z", 4.0);
        assert_eq!(f.to_vec3_or(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 4.0));
        assert_eq!(Fields::vec3(Vec3::X).len(), 3);
    }

    #[test]
    fn validate_rejects_disjoint_fields() {
        let tween: Tween<()> = Tween::new(x(0.0))
            .to(Fields::new().with("opacity", 1.0), 100.0)
            .label("fade");
        let err = tween.validate().unwrap_err();
        assert!(err.to_string().contains("fade"));
        assert!(err.to_string().contains("share no field"));
    }

    #[test]
    fn validate_rejects_non_finite_values_and_durations() {
        let nan: Tween<()> = Tween::new(x(f64::NAN)).to(x(1.0), 100.0);
        assert!(nan.validate().is_err());
        let negative: Tween<()> = Tween::new(x(0.0)).to(x(1.0), -1.0);
        assert!(negative.validate().is_err());
        let bad_delay: Tween<()> = Tween::new(x(0.0)).to(x(1.0), 1.0).delay(f64::INFINITY);
        assert!(bad_delay.validate().is_err());
    }

    #[test]
    fn zero_duration_samples_end() {
        let tween: Tween<()> = Tween::new(x(0.0)).to(x(1.0), 0.0);
        assert!(tween.validate().is_ok());
        assert_eq!(tween.sample(0.0).get("x"), Some(1.0));
    }
}

/// Quiet period after which a burst of scroll events fires.
pub const DEFAULT_DEBOUNCE_MS: f64 = 100.0;

/// Trailing-edge debouncer.
///
/// Every `push` restarts the quiet window and replaces the pending value;
/// `poll` hands the last value out once the window has passed.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    wait_ms: f64,
    pending: Option<(T, f64)>,
}

impl<T> Debouncer<T> {
    pub fn new(wait_ms: f64) -> Self {
        Self {
            wait_ms,
            pending: None,
        }
    }

    pub fn wait_ms(&self) -> f64 {
        self.wait_ms
    }

    pub fn push(&mut self, value: T, now_ms: f64) {
        if self.pending.is_some() {
            tracing::trace!(now_ms, "debounce window restarted");
        }
        self.pending = Some((value, now_ms + self.wait_ms));
    }

    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        let due = self.pending.as_ref().map(|(_, due)| *due)?;
        if now_ms < due {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_quiet_window() {
        let mut d = Debouncer::default();
        d.push(1, 0.0);
        assert_eq!(d.poll(99.0), None);
        assert_eq!(d.poll(100.0), Some(1));
        assert_eq!(d.poll(200.0), None);
    }

    #[test]
    fn burst_collapses_to_last_value() {
        let mut d = Debouncer::new(100.0);
        d.push("a", 0.0);
        d.push("b", 50.0);
        d.push("c", 90.0);
        assert_eq!(d.poll(150.0), None);
        assert!(d.is_pending());
        assert_eq!(d.poll(190.0), Some("c"));
        assert!(!d.is_pending());
    }
}

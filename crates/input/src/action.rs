use serde::{Deserialize, Serialize};

/// The only input the storyboard consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    /// Scrolling down the page: advance the presentation.
    Forward,
    /// Scrolling up the page.
    Backward,
}

/// A raw wheel or touch-move sample as delivered by the host.
///
/// Hosts that report the legacy `wheel_delta` (positive = up) set it;
/// everything else only fills `delta_y` (negative = up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    #[serde(default)]
    pub wheel_delta: Option<f64>,
    #[serde(default)]
    pub delta_y: f64,
}

impl WheelDelta {
    pub fn from_delta_y(delta_y: f64) -> Self {
        Self {
            wheel_delta: None,
            delta_y,
        }
    }

    pub fn legacy(wheel_delta: f64) -> Self {
        Self {
            wheel_delta: Some(wheel_delta),
            delta_y: 0.0,
        }
    }

    /// Scrolling up is `Backward`; everything else, including a zero delta, is `Forward`.
    pub fn direction(&self) -> ScrollDirection {
        let up = match self.wheel_delta {
            Some(w) if w != 0.0 => w > 0.0,
            _ => self.delta_y < 0.0,
        };
        if up {
            ScrollDirection::Backward
        } else {
            ScrollDirection::Forward
        }
    }
}

impl From<WheelDelta> for ScrollDirection {
    fn from(delta: WheelDelta) -> Self {
        delta.direction()
    }
}

use std::f64::consts::PI;

/// Maps normalized time in [0, 1] to normalized progress.
///
/// Every curve returns exactly 0 at 0 and exactly 1 at 1; inputs outside
/// the unit range are clamped first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuinticIn,
    QuinticOut,
    QuinticInOut,
    SineInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::QuadraticIn => t * t,
            Easing::QuadraticOut => t * (2.0 - t),
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
            Easing::QuinticIn => t.powi(5),
            Easing::QuinticOut => {
                let u = t - 1.0;
                u.powi(5) + 1.0
            }
            Easing::QuinticInOut => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u.powi(5) + 1.0
                }
            }
            Easing::SineInOut => 0.5 * (1.0 - (PI * t).cos()),
        }
    }
}

//! Easing functions for tweens
//!
//! Every curve maps a normalized time ratio `t` in `[0, 1]` to a progress
//! ratio. Progress is not bounded to `[0, 1]`: `OutBack`, `Elastic` and
//! `Spring` overshoot on purpose.

use rustc_hash::FxHashMap;
use std::f32::consts::PI;
use std::fmt;
use std::rc::Rc;

/// A user-supplied easing curve registered at runtime
pub type CustomEase = Rc<dyn Fn(f32) -> f32>;

/// Physical parameters of the damped harmonic oscillator used by [`spring`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
    /// Initial velocity
    pub velocity: f32,
}

impl SpringParams {
    pub fn new(mass: f32, stiffness: f32, damping: f32, velocity: f32) -> Self {
        Self {
            mass,
            stiffness,
            damping,
            velocity,
        }
    }

    /// Damping coefficient at which the oscillator stops overshooting
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Damping ratio ζ; below 1 the curve oscillates around its target
    pub fn damping_ratio(&self) -> f32 {
        self.damping / self.critical_damping()
    }

    pub fn is_underdamped(&self) -> bool {
        self.damping_ratio() < 1.0
    }
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 100.0,
            damping: 10.0,
            velocity: 0.0,
        }
    }
}

/// Easing function type
#[derive(Clone, Default)]
pub enum Easing {
    #[default]
    Linear,
    OutQuad,
    OutCubic,
    InOutQuad,
    OutBack,
    Elastic {
        amplitude: f32,
        period: f32,
    },
    Bounce,
    Spring(SpringParams),
    Custom(CustomEase),
}

impl Easing {
    /// Elastic curve with the default amplitude (1) and period (0.3)
    pub fn elastic() -> Self {
        Easing::Elastic {
            amplitude: 1.0,
            period: 0.3,
        }
    }

    /// Spring curve with [`SpringParams::default`]
    pub fn spring() -> Self {
        Easing::Spring(SpringParams::default())
    }

    /// Wrap an arbitrary function as an easing curve
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + 'static,
    {
        Easing::Custom(Rc::new(f))
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::OutQuad => out_quad(t),
            Easing::OutCubic => out_cubic(t),
            Easing::InOutQuad => in_out_quad(t),
            Easing::OutBack => out_back(t),
            Easing::Elastic { amplitude, period } => elastic(t, *amplitude, *period),
            Easing::Bounce => bounce(t),
            Easing::Spring(params) => spring(t, params),
            Easing::Custom(f) => f(t),
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("Linear"),
            Easing::OutQuad => f.write_str("OutQuad"),
            Easing::OutCubic => f.write_str("OutCubic"),
            Easing::InOutQuad => f.write_str("InOutQuad"),
            Easing::OutBack => f.write_str("OutBack"),
            Easing::Elastic { amplitude, period } => f
                .debug_struct("Elastic")
                .field("amplitude", amplitude)
                .field("period", period)
                .finish(),
            Easing::Bounce => f.write_str("Bounce"),
            Easing::Spring(params) => f.debug_tuple("Spring").field(params).finish(),
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

pub fn out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

pub fn out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

pub fn in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Overshoots past 1 before settling back
pub fn out_back(t: f32) -> f32 {
    const C1: f32 = 1.70158;
    const C3: f32 = C1 + 1.0;
    1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
}

/// Exponentially decaying sine around 1.
///
/// The boundaries are returned unchanged, and so is everything when `period`
/// is not positive (the oscillation term would divide by zero).
pub fn elastic(t: f32, amplitude: f32, period: f32) -> f32 {
    if t == 0.0 || t == 1.0 || period <= 0.0 {
        return t;
    }
    amplitude * 2f32.powf(-10.0 * t) * ((t - period / 4.0) * (2.0 * PI) / period).sin() + 1.0
}

/// Four-segment piecewise quadratic
pub fn bounce(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// Closed-form damped harmonic oscillator approaching displacement 1.
///
/// `t` is fed in directly as oscillator time, so with the default parameters
/// the curve has not fully settled at `t = 1`.
pub fn spring(t: f32, params: &SpringParams) -> f32 {
    let w0 = (params.stiffness / params.mass).sqrt();
    let zeta = params.damping / (2.0 * (params.stiffness * params.mass).sqrt());

    if zeta < 1.0 {
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let a = 1.0;
        let b = (zeta * w0 - params.velocity) / wd;
        1.0 - (-zeta * w0 * t).exp() * (a * (wd * t).cos() + b * (wd * t).sin())
    } else {
        1.0 - (-w0 * t).exp()
    }
}

/// Name to easing lookup table.
///
/// Seeded with the built-in curves; [`EaseRegistry::register`] adds or
/// replaces entries. Registered functions are not validated.
#[derive(Clone, Debug)]
pub struct EaseRegistry {
    entries: FxHashMap<String, Easing>,
}

impl EaseRegistry {
    pub fn new() -> Self {
        let mut entries = FxHashMap::default();
        entries.insert("linear".to_string(), Easing::Linear);
        entries.insert("outQuad".to_string(), Easing::OutQuad);
        entries.insert("outCubic".to_string(), Easing::OutCubic);
        entries.insert("inOutQuad".to_string(), Easing::InOutQuad);
        entries.insert("outBack".to_string(), Easing::OutBack);
        entries.insert("elastic".to_string(), Easing::elastic());
        entries.insert("bounce".to_string(), Easing::Bounce);
        entries.insert("spring".to_string(), Easing::spring());
        Self { entries }
    }

    /// Register a curve under `name`, replacing any previous entry
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(f32) -> f32 + 'static,
    {
        let name = name.into();
        tracing::debug!("EaseRegistry: register {}", name);
        self.entries.insert(name, Easing::custom(f));
    }

    pub fn get(&self, name: &str) -> Option<Easing> {
        self.entries.get(name).cloned()
    }

    /// Look up `name`, falling back to [`Easing::Linear`] when unknown
    pub fn resolve(&self, name: &str) -> Easing {
        self.get(name).unwrap_or_else(|| {
            tracing::debug!("EaseRegistry: unknown ease {}, using linear", name);
            Easing::Linear
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for EaseRegistry {
    fn default() -> Self {
        Self::new()
    }
}

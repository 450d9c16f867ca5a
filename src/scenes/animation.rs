//! Frame-driven easing primitives shared by every scene.
//!
//! All functions are pure: the same inputs always produce the same output,
//! so any frame can be computed without replaying the frames before it.

/// Physical parameters of a spring animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub damping: f64,
    pub mass: f64,
    pub stiffness: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            mass: 1.0,
            stiffness: 100.0,
        }
    }
}

impl SpringConfig {
    pub fn damped(damping: f64) -> Self {
        Self {
            damping,
            ..Self::default()
        }
    }

    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }
}

/// Behavior of [`interpolate`] outside its input window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extrapolate {
    /// Continue the line past the window.
    Extend,
    /// Hold the edge value.
    Clamp,
}

#[derive(Debug, Clone, Copy)]
struct SpringState {
    position: f64,
    velocity: f64,
    timestamp_ms: f64,
}

/// Spring progress from 0 toward 1 after `frame` frames at `fps`.
///
/// The spring starts at rest and is advanced one frame at a time using the
/// closed-form damped-oscillator solution over each step. Damping ratios of
/// 1 or more use the critically damped solution. Negative frames (a delayed
/// spring that has not started) return 0.
pub fn spring(frame: f64, fps: f64, config: SpringConfig) -> f64 {
    if frame <= 0.0 || !frame.is_finite() {
        return 0.0;
    }

    let mut state = SpringState {
        position: 0.0,
        velocity: 0.0,
        timestamp_ms: 0.0,
    };

    let whole = frame.floor() as u64;
    let remainder = frame - whole as f64;
    for step in 1..=whole {
        let mut f = step as f64;
        if step == whole {
            f += remainder;
        }
        state = advance(state, f / fps * 1000.0, 1.0, config);
    }
    if whole == 0 {
        state = advance(state, remainder / fps * 1000.0, 1.0, config);
    }
    state.position
}

fn advance(state: SpringState, now_ms: f64, target: f64, config: SpringConfig) -> SpringState {
    // Large steps are capped so a long pause cannot destabilize the spring.
    let delta_ms = (now_ms - state.timestamp_ms).min(64.0);
    let t = delta_ms / 1000.0;

    let c = config.damping;
    let m = config.mass;
    let k = config.stiffness;

    let v0 = -state.velocity;
    let x0 = target - state.position;

    let zeta = c / (2.0 * (k * m).sqrt());
    let omega0 = (k / m).sqrt();

    let (position, velocity) = if zeta < 1.0 {
        let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
        let (sin1, cos1) = (omega1 * t).sin_cos();
        let envelope = (-zeta * omega0 * t).exp();
        let frag = envelope * (sin1 * ((v0 + zeta * omega0 * x0) / omega1) + x0 * cos1);
        let velocity = zeta * omega0 * frag
            - envelope * (cos1 * (v0 + zeta * omega0 * x0) - omega1 * x0 * sin1);
        (target - frag, velocity)
    } else {
        let envelope = (-omega0 * t).exp();
        let position = target - envelope * (x0 + (v0 + omega0 * x0) * t);
        let velocity = envelope * (v0 * (t * omega0 - 1.0) + t * x0 * omega0 * omega0);
        (position, velocity)
    };

    SpringState {
        position,
        velocity,
        timestamp_ms: now_ms,
    }
}

/// Map `input` linearly from `[in_start, in_end]` onto `[out_start, out_end]`.
///
/// A degenerate window (`in_end <= in_start`) behaves as a step at `in_start`.
pub fn interpolate(
    input: f64,
    (in_start, in_end): (f64, f64),
    (out_start, out_end): (f64, f64),
    left: Extrapolate,
    right: Extrapolate,
) -> f64 {
    if in_end <= in_start {
        return if input < in_start { out_start } else { out_end };
    }
    if input < in_start && left == Extrapolate::Clamp {
        return out_start;
    }
    if input > in_end && right == Extrapolate::Clamp {
        return out_end;
    }
    let progress = (input - in_start) / (in_end - in_start);
    out_start + progress * (out_end - out_start)
}

/// [`interpolate`] clamped on both sides.
pub fn interpolate_clamped(input: f64, window: (f64, f64), range: (f64, f64)) -> f64 {
    interpolate(input, window, range, Extrapolate::Clamp, Extrapolate::Clamp)
}

/// Integer counter rising from 0 to `target` over `window` frames starting
/// at `start`. Never decreases as `frame` grows and never exceeds `target`.
pub fn count_up(frame: f64, start: f64, window: f64, target: u64) -> u64 {
    let value = interpolate_clamped(frame, (start, start + window), (0.0, target as f64));
    (value.round() as u64).min(target)
}

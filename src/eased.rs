//! Eased scalars: the `default / current / next` triple every animated
//! quantity (eye size, position, spacing, eyelid coverage) is built from.
//!
//! Each tick moves `current` halfway toward `next`. Nothing ever snaps except
//! explicit (re)initialization, which goes through [`EasedScalar::snap`].

/// Round half toward +infinity, matching the rounding the eye geometry was
/// tuned against (`round(-2.5) == -2`, `round(2.5) == 3`).
pub fn js_round(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EasedScalar {
    /// Resting target restored by open / spring-back / centering.
    pub default: f64,
    /// Value that gets drawn.
    pub current: f64,
    /// Value being eased toward.
    pub next: f64,
}

impl EasedScalar {
    pub const fn new(v: f64) -> Self {
        Self { default: v, current: v, next: v }
    }

    pub fn set_target(&mut self, v: f64) {
        self.next = v;
    }

    /// Update the resting value and ease toward it.
    pub fn set_default(&mut self, v: f64) {
        self.default = v;
        self.next = v;
    }

    /// Jump straight to `v` (initialize / resize only).
    pub fn snap(&mut self, v: f64) {
        self.current = v;
        self.next = v;
    }

    /// Shift `current` without touching the target.
    pub fn nudge(&mut self, delta: f64) {
        self.current += delta;
    }

    pub fn reset_to_default(&mut self) {
        self.next = self.default;
    }

    pub fn advance(&mut self) -> f64 {
        self.advance_with(0.0)
    }

    /// One easing step with a transient `offset` folded into the target.
    pub fn advance_with(&mut self, offset: f64) -> f64 {
        self.current = js_round((self.current + self.next + offset) / 2.0);
        self.current
    }

    /// True once `current` sits within rounding distance of `next`.
    pub fn settled(&self) -> bool {
        (self.current - self.next).abs() <= 1.0
    }
}

impl Default for EasedScalar {
    fn default() -> Self {
        Self::new(0.0)
    }
}

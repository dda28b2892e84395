//! The eye animator: all mood / geometry / animation state for one pair of
//! eyes, the command surface that reconfigures it, and (in `pipeline` and
//! `compose`) the per-tick easing and drawing.
//!
//! Setters never draw. They write `next` / `default` slots and the following
//! ticks ease toward them. Only initialization snaps `current`.

mod compose;
mod pipeline;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use crate::color::Color;
use crate::eased::EasedScalar;
use crate::error::{EyesError, Result};
use crate::mood::{Mood, Position};
use crate::surface::Surface;
use crate::sweat::SweatDrop;
use crate::timer::{PulseTimer, ScheduledTimer};

pub const DEFAULT_SCREEN_SIZE: f64 = 320.0;
pub const DEFAULT_FRAME_RATE: f64 = 50.0;
pub const DEFAULT_EYE_SIZE: f64 = 150.0;
pub const DEFAULT_CORNER_RADIUS: f64 = 75.0;
pub const DEFAULT_SPACING: f64 = 80.0;

pub const AUTOBLINK_INTERVAL_S: f64 = 1.0;
pub const AUTOBLINK_VARIATION_S: f64 = 4.0;
pub const IDLE_INTERVAL_S: f64 = 1.0;
pub const IDLE_VARIATION_S: f64 = 3.0;
pub const H_FLICKER_AMPLITUDE: f64 = 4.0;
pub const V_FLICKER_AMPLITUDE: f64 = 20.0;

/// Target height of a closed eye.
pub(crate) const CLOSED_HEIGHT: f64 = 1.0;
pub(crate) const CURIOUS_BOOST: f64 = 16.0;
pub(crate) const CURIOUS_MARGIN: f64 = 20.0;
pub(crate) const LAUGH_AMPLITUDE: f64 = 10.0;
pub(crate) const CONFUSED_AMPLITUDE: f64 = 40.0;

const FALLBACK_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Geometry of one eye. Every quantity is eased independently.
#[derive(Clone, Debug, PartialEq)]
pub struct Eye {
    pub width: EasedScalar,
    pub height: EasedScalar,
    pub radius: EasedScalar,
    pub x: EasedScalar,
    pub y: EasedScalar,
    /// Transient height boost from curiosity, recomputed every tick.
    pub height_offset: f64,
    /// Open eyes spring back to their default height after collapsing.
    pub open: bool,
}

impl Eye {
    fn new(width: f64, height: f64, radius: f64) -> Self {
        Self {
            width: EasedScalar::new(width),
            height: EasedScalar::new(height),
            radius: EasedScalar::new(radius),
            x: EasedScalar::new(0.0),
            y: EasedScalar::new(0.0),
            height_offset: 0.0,
            open: true,
        }
    }

    fn close(&mut self) {
        self.height.set_target(CLOSED_HEIGHT);
        self.open = false;
    }

    fn reopen(&mut self) {
        self.height.reset_to_default();
        self.open = true;
    }
}

/// Eyelid coverage driven by the mood: triangle height for tired / angry,
/// bottom offset for happy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Eyelids {
    pub tired: EasedScalar,
    pub angry: EasedScalar,
    pub happy: EasedScalar,
}

/// Alternating positional jitter on one axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Flicker {
    pub enabled: bool,
    pub amplitude: f64,
    /// Sign of the next shift: `true` shifts by `+amplitude`.
    pub alternate: bool,
}

impl Flicker {
    fn new(amplitude: f64) -> Self {
        Self { enabled: false, amplitude, alternate: false }
    }

    fn set(&mut self, enabled: bool, amplitude: f64) {
        self.enabled = enabled;
        self.amplitude = amplitude;
    }

    /// Shift for this tick, flipping the sign for the next one.
    fn shift(&mut self) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        let d = if self.alternate { self.amplitude } else { -self.amplitude };
        self.alternate = !self.alternate;
        Some(d)
    }
}

pub struct EyeAnimator<S: Surface> {
    surface: S,
    rng: SmallRng,

    screen_width: f64,
    screen_height: f64,
    frame_interval_ms: f64,
    last_frame_at: Option<f64>,

    background: Color,
    main: Color,
    tear: Option<Color>,

    left: Eye,
    right: Eye,
    spacing: EasedScalar,

    mood: Mood,
    eyelids: Eyelids,
    curious: bool,
    cyclops: bool,
    h_flicker: Flicker,
    v_flicker: Flicker,

    autoblink: ScheduledTimer,
    idle: ScheduledTimer,
    laugh: PulseTimer,
    confused: PulseTimer,

    sweat: bool,
    watery: bool,
    drops: [SweatDrop; 3],
}

impl<S: Surface> EyeAnimator<S> {
    /// Animator on a 320x320 surface at 50 fps with an entropy-seeded RNG.
    pub fn new(surface: S) -> Self {
        Self::with_seed(surface, entropy_seed())
    }

    /// Deterministic animator: every random choice (blink / idle schedule,
    /// wander target, sweat drops) derives from `seed`.
    pub fn with_seed(surface: S, seed: u64) -> Self {
        let mut animator = Self {
            surface,
            rng: SmallRng::seed_from_u64(seed),
            screen_width: DEFAULT_SCREEN_SIZE,
            screen_height: DEFAULT_SCREEN_SIZE,
            frame_interval_ms: 1000.0 / DEFAULT_FRAME_RATE,
            last_frame_at: None,
            background: Color::BACKGROUND,
            main: Color::MAIN,
            tear: None,
            left: Eye::new(DEFAULT_EYE_SIZE, DEFAULT_EYE_SIZE, DEFAULT_CORNER_RADIUS),
            right: Eye::new(DEFAULT_EYE_SIZE, DEFAULT_EYE_SIZE, DEFAULT_CORNER_RADIUS),
            spacing: EasedScalar::new(DEFAULT_SPACING),
            mood: Mood::Default,
            eyelids: Eyelids::default(),
            curious: false,
            cyclops: false,
            h_flicker: Flicker::new(H_FLICKER_AMPLITUDE),
            v_flicker: Flicker::new(V_FLICKER_AMPLITUDE),
            autoblink: ScheduledTimer::new(AUTOBLINK_INTERVAL_S, AUTOBLINK_VARIATION_S),
            idle: ScheduledTimer::new(IDLE_INTERVAL_S, IDLE_VARIATION_S),
            laugh: PulseTimer::default(),
            confused: PulseTimer::default(),
            sweat: false,
            watery: false,
            drops: SweatDrop::trio(),
        };
        animator.center_eyes();
        animator
    }

    // --- configuration -------------------------------------------------------

    /// Resize the surface, set the frame rate, re-center both eyes fully open
    /// and clear the surface once.
    pub fn initialize(&mut self, width: f64, height: f64, frame_rate: f64) -> Result<()> {
        check_screen(width, height, frame_rate)?;
        self.frame_interval_ms = 1000.0 / frame_rate;
        self.screen_width = width;
        self.screen_height = height;
        self.center_eyes();
        self.left.height.current = self.left.height.default;
        self.right.height.current = self.right.height.default;
        self.surface.clear(self.background);
        info!(width, height, frame_rate, "eyes initialized");
        Ok(())
    }

    /// Same as [`initialize`](Self::initialize) keeping the frame rate.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        let fps = 1000.0 / self.frame_interval_ms;
        self.initialize(width, height, fps)
    }

    pub fn set_frame_rate(&mut self, frame_rate: f64) -> Result<()> {
        check_frame_rate(frame_rate)?;
        self.frame_interval_ms = 1000.0 / frame_rate;
        Ok(())
    }

    pub fn set_display_colors(&mut self, background: Color, main: Color) {
        self.background = background;
        self.main = main;
    }

    pub fn set_eye_size(&mut self, left: f64, right: f64) {
        self.left.width.set_default(sanitize("eye width", left));
        self.right.width.set_default(sanitize("eye width", right));
    }

    pub fn set_eye_height(&mut self, left: f64, right: f64) {
        self.left.height.set_default(sanitize("eye height", left));
        self.right.height.set_default(sanitize("eye height", right));
    }

    pub fn set_corner_radius(&mut self, left: f64, right: f64) {
        self.left.radius.set_default(sanitize("corner radius", left));
        self.right.radius.set_default(sanitize("corner radius", right));
    }

    pub fn set_spacing(&mut self, px: f64) {
        self.spacing.set_default(sanitize("spacing", px));
    }

    pub fn set_mood(&mut self, mood: Mood) {
        if self.mood != mood {
            debug!(?mood, "mood changed");
        }
        self.mood = mood;
    }

    /// Aim the left eye at one of the nine anchors of the travel rectangle.
    /// The right eye follows on the next tick.
    pub fn set_gaze_position(&mut self, position: Position) {
        let (x, y) = position.anchor(self.travel_x(), self.travel_y());
        self.left.x.set_target(x);
        self.left.y.set_target(y);
    }

    pub fn set_auto_blink(&mut self, enabled: bool, interval_s: f64, variation_s: f64) {
        self.autoblink.configure(enabled, interval_s, variation_s);
    }

    pub fn set_idle_wander(&mut self, enabled: bool, interval_s: f64, variation_s: f64) {
        self.idle.configure(enabled, interval_s, variation_s);
    }

    pub fn set_curious(&mut self, curious: bool) {
        self.curious = curious;
    }

    pub fn set_cyclops(&mut self, cyclops: bool) {
        self.cyclops = cyclops;
    }

    pub fn set_horizontal_flicker(&mut self, enabled: bool, amplitude: f64) {
        self.h_flicker.set(enabled, amplitude);
    }

    pub fn set_vertical_flicker(&mut self, enabled: bool, amplitude: f64) {
        self.v_flicker.set(enabled, amplitude);
    }

    pub fn set_sweat(&mut self, sweat: bool) {
        self.sweat = sweat;
    }

    /// Color of sweat / tear drops; `None` draws them in the main color.
    pub fn set_tear_color(&mut self, color: Option<Color>) {
        self.tear = color;
    }

    pub fn set_watery_eyes(&mut self, watery: bool) {
        self.watery = watery;
    }

    // --- commands --------------------------------------------------------------

    pub fn close_eyes(&mut self) {
        self.close_eye(true, true);
    }

    pub fn open_eyes(&mut self) {
        self.open_eye(true, true);
    }

    /// Close then immediately reopen. The reopen retargets the default height,
    /// so only the easing between ticks is visible.
    pub fn blink(&mut self) {
        self.blink_eye(true, true);
    }

    pub fn close_eye(&mut self, left: bool, right: bool) {
        if left {
            self.left.close();
        }
        if right {
            self.right.close();
        }
    }

    pub fn open_eye(&mut self, left: bool, right: bool) {
        if left {
            self.left.reopen();
        }
        if right {
            self.right.reopen();
        }
    }

    pub fn blink_eye(&mut self, left: bool, right: bool) {
        self.close_eye(left, right);
        self.open_eye(left, right);
    }

    /// 500 ms horizontal shake. No-op while a confused pulse is running.
    pub fn play_confused_pulse(&mut self) {
        self.confused.arm();
    }

    /// 500 ms vertical bounce. No-op while a laugh pulse is running.
    pub fn play_laugh_pulse(&mut self) {
        self.laugh.arm();
    }

    // --- accessors -------------------------------------------------------------

    pub fn screen_size(&self) -> (f64, f64) {
        (self.screen_width, self.screen_height)
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }

    pub fn left(&self) -> &Eye {
        &self.left
    }

    pub fn right(&self) -> &Eye {
        &self.right
    }

    pub fn spacing(&self) -> &EasedScalar {
        &self.spacing
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn eyelids(&self) -> &Eyelids {
        &self.eyelids
    }

    pub fn is_curious(&self) -> bool {
        self.curious
    }

    pub fn is_cyclops(&self) -> bool {
        self.cyclops
    }

    pub fn is_sweating(&self) -> bool {
        self.sweat
    }

    pub fn has_watery_eyes(&self) -> bool {
        self.watery
    }

    pub fn colors(&self) -> (Color, Color) {
        (self.background, self.main)
    }

    pub fn tear_color(&self) -> Option<Color> {
        self.tear
    }

    pub fn horizontal_flicker(&self) -> &Flicker {
        &self.h_flicker
    }

    pub fn vertical_flicker(&self) -> &Flicker {
        &self.v_flicker
    }

    pub fn auto_blink(&self) -> &ScheduledTimer {
        &self.autoblink
    }

    pub fn idle_wander(&self) -> &ScheduledTimer {
        &self.idle
    }

    pub fn laugh_pulse(&self) -> &PulseTimer {
        &self.laugh
    }

    pub fn confused_pulse(&self) -> &PulseTimer {
        &self.confused
    }

    pub fn sweat_drops(&self) -> &[SweatDrop; 3] {
        &self.drops
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Horizontal travel range of the left eye's x. Negative when the pair is
    /// wider than the surface; the anchors then sit left of the origin.
    pub fn travel_x(&self) -> f64 {
        self.screen_width - self.left.width.current - self.spacing.current - self.right.width.current
    }

    /// Vertical travel range of the eyes' y.
    pub fn travel_y(&self) -> f64 {
        self.screen_height - self.left.height.default
    }

    // --- internals -------------------------------------------------------------

    /// Center both eyes horizontally (pair plus gap) and vertically (left eye
    /// height), snapping default, current and next.
    fn center_eyes(&mut self) {
        let span = self.left.width.default + self.spacing.default + self.right.width.default;
        let lx = (self.screen_width - span) / 2.0;
        let ly = (self.screen_height - self.left.height.default) / 2.0;
        let rx = lx + self.left.width.default + self.spacing.default;
        self.left.x = EasedScalar::new(lx);
        self.left.y = EasedScalar::new(ly);
        self.right.x = EasedScalar::new(rx);
        self.right.y = EasedScalar::new(ly);
    }
}

/// Check the arguments of [`EyeAnimator::initialize`] without touching any
/// state.
pub fn check_screen(width: f64, height: f64, frame_rate: f64) -> Result<()> {
    check_dimension("width", width)?;
    check_dimension("height", height)?;
    check_frame_rate(frame_rate)
}

fn check_frame_rate(frame_rate: f64) -> Result<()> {
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return Err(EyesError::invalid(format!("frame rate must be > 0, got {frame_rate}")));
    }
    Ok(())
}

fn check_dimension(name: &str, v: f64) -> Result<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(EyesError::invalid(format!("{name} must be > 0, got {v}")));
    }
    Ok(())
}

fn sanitize(name: &str, v: f64) -> f64 {
    if v.is_finite() && v >= 0.0 {
        return v;
    }
    warn!(name, value = v, "clamping invalid size to 0");
    0.0
}

pub(crate) fn entropy_seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    FALLBACK_SEED
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recorder;

    fn animator() -> EyeAnimator<Recorder> {
        let mut a = EyeAnimator::with_seed(Recorder::new(), 1);
        a.initialize(320.0, 320.0, 50.0).unwrap();
        a
    }

    #[test]
    fn initialize_centers_pair_and_clears_once() {
        let a = animator();
        assert_eq!(a.left().x.current, -30.0); // (320 - 380) / 2
        assert_eq!(a.left().y.current, 85.0);
        assert_eq!(a.right().x.current, 200.0);
        assert_eq!(a.right().y.current, 85.0);
        assert_eq!(a.left().height.current, 150.0);
        assert_eq!(a.frame_interval_ms(), 20.0);
        assert_eq!(a.surface().frames(), 1);
    }

    #[test]
    fn initialize_rejects_bad_input() {
        let mut a = animator();
        assert!(matches!(
            a.initialize(320.0, 320.0, 0.0),
            Err(EyesError::InvalidConfiguration(_))
        ));
        assert!(a.initialize(-1.0, 320.0, 50.0).is_err());
        assert!(a.initialize(320.0, f64::NAN, 50.0).is_err());
        // Rejected calls leave the previous state untouched.
        assert_eq!(a.screen_size(), (320.0, 320.0));
        assert_eq!(a.frame_interval_ms(), 20.0);
    }

    #[test]
    fn screen_check_matches_initialize() {
        assert!(check_screen(320.0, 240.0, 30.0).is_ok());
        assert!(check_screen(640.0, 480.0, 0.0).is_err());
        assert!(check_screen(f64::NAN, 480.0, 30.0).is_err());
        assert!(check_screen(640.0, 0.0, 30.0).is_err());
        assert!(check_screen(640.0, 480.0, f64::INFINITY).is_err());
    }

    #[test]
    fn resize_keeps_frame_rate() {
        let mut a = animator();
        a.set_frame_rate(25.0).unwrap();
        a.resize(640.0, 480.0).unwrap();
        assert_eq!(a.screen_size(), (640.0, 480.0));
        assert_eq!(a.frame_interval_ms(), 40.0);
        assert_eq!(a.left().x.current, 130.0);
    }

    #[test]
    fn size_setters_write_default_and_next_only() {
        let mut a = animator();
        a.set_eye_size(100.0, 90.0);
        a.set_eye_height(-5.0, 80.0);
        a.set_spacing(40.0);
        assert_eq!(a.left().width.current, 150.0);
        assert_eq!((a.left().width.default, a.left().width.next), (100.0, 100.0));
        assert_eq!(a.right().width.next, 90.0);
        assert_eq!(a.left().height.next, 0.0, "negative height clamps to 0");
        assert_eq!(a.spacing().next, 40.0);
    }

    #[test]
    fn close_and_open_drive_targets_and_flags() {
        let mut a = animator();
        a.close_eye(true, false);
        assert_eq!(a.left().height.next, CLOSED_HEIGHT);
        assert!(!a.left().open);
        assert!(a.right().open);
        a.open_eyes();
        assert_eq!(a.left().height.next, 150.0);
        assert!(a.left().open);
    }

    #[test]
    fn gaze_anchor_uses_live_travel_range() {
        let mut a = animator();
        a.set_gaze_position(Position::SE);
        assert_eq!(a.left().x.next, -60.0);
        assert_eq!(a.left().y.next, 170.0);
        a.set_gaze_position(Position::Center);
        assert_eq!((a.left().x.next, a.left().y.next), (-30.0, 85.0));
        a.set_cyclops(true);
        a.tick(1000.0);
        a.set_gaze_position(Position::E);
        assert_eq!(a.left().x.next, 170.0, "collapsed right eye widens travel");
    }

    #[test]
    fn flicker_alternates_sign() {
        let mut f = Flicker::new(4.0);
        assert_eq!(f.shift(), None);
        f.set(true, 4.0);
        assert_eq!(f.shift(), Some(-4.0));
        assert_eq!(f.shift(), Some(4.0));
        assert_eq!(f.shift(), Some(-4.0));
    }
}

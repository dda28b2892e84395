//! Page-level expression layer: named emotion presets built from the
//! animator's primitives, keyboard / voice command mapping, pointer gaze and
//! the automatic emotion cycler.

use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::animator::{
    EyeAnimator, H_FLICKER_AMPLITUDE, IDLE_INTERVAL_S, IDLE_VARIATION_S, V_FLICKER_AMPLITUDE,
    entropy_seed,
};
use crate::color::Color;
use crate::error::EyesError;
use crate::mood::{Mood, Position};
use crate::surface::Surface;
use crate::timer::ScheduledTimer;

/// Pointer positions closer than this to the canvas center leave the gaze alone.
pub const GAZE_DEAD_ZONE: f64 = 20.0;
pub const AUTO_MODE_INTERVAL_S: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emotion {
    Idle,
    Happy,
    Processing,
    Alert,
    Error,
    Love,
    Sleep,
    Scan,
    Tired,
    Angry,
    Confused,
    Laugh,
}

impl Emotion {
    pub const ALL: [Emotion; 12] = [
        Emotion::Idle,
        Emotion::Happy,
        Emotion::Processing,
        Emotion::Alert,
        Emotion::Error,
        Emotion::Love,
        Emotion::Sleep,
        Emotion::Scan,
        Emotion::Tired,
        Emotion::Angry,
        Emotion::Confused,
        Emotion::Laugh,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Emotion::Idle => "idle",
            Emotion::Happy => "happy",
            Emotion::Processing => "processing",
            Emotion::Alert => "alert",
            Emotion::Error => "error",
            Emotion::Love => "love",
            Emotion::Sleep => "sleep",
            Emotion::Scan => "scan",
            Emotion::Tired => "tired",
            Emotion::Angry => "angry",
            Emotion::Confused => "confused",
            Emotion::Laugh => "laugh",
        }
    }

    pub fn main_color(self) -> Color {
        match self {
            Emotion::Happy | Emotion::Laugh => Color::rgb(0x00, 0xff, 0x00),
            Emotion::Tired | Emotion::Sleep => Color::rgb(0x88, 0x00, 0xff),
            Emotion::Angry | Emotion::Error => Color::rgb(0xff, 0x00, 0x00),
            Emotion::Alert => Color::rgb(0xff, 0xaa, 0x00),
            Emotion::Processing => Color::rgb(0x00, 0x88, 0xff),
            Emotion::Love => Color::rgb(0xff, 0x00, 0xaa),
            Emotion::Confused | Emotion::Scan => Color::rgb(0x00, 0xff, 0xff),
            Emotion::Idle => Color::MAIN,
        }
    }

    /// Reset mood, sweat and both flickers, then layer this preset on top.
    /// Idle wander is only touched by the presets that use it.
    pub fn apply<S: Surface>(self, eyes: &mut EyeAnimator<S>) {
        eyes.set_mood(Mood::Default);
        eyes.set_sweat(false);
        eyes.set_horizontal_flicker(false, H_FLICKER_AMPLITUDE);
        eyes.set_vertical_flicker(false, V_FLICKER_AMPLITUDE);
        eyes.set_display_colors(Color::BACKGROUND, self.main_color());

        match self {
            Emotion::Happy | Emotion::Love => eyes.set_mood(Mood::Happy),
            Emotion::Tired | Emotion::Sleep => eyes.set_mood(Mood::Tired),
            Emotion::Angry | Emotion::Error => eyes.set_mood(Mood::Angry),
            Emotion::Alert => eyes.set_horizontal_flicker(true, 8.0),
            Emotion::Processing => eyes.set_idle_wander(true, 1.0, 2.0),
            Emotion::Confused => eyes.play_confused_pulse(),
            Emotion::Laugh => {
                eyes.set_mood(Mood::Happy);
                eyes.play_laugh_pulse();
            }
            Emotion::Scan => eyes.set_idle_wander(true, 0.5, 1.0),
            Emotion::Idle => eyes.set_idle_wander(false, IDLE_INTERVAL_S, IDLE_VARIATION_S),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Emotion {
    type Err = EyesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Emotion::ALL
            .into_iter()
            .find(|e| e.name() == wanted)
            .ok_or_else(|| EyesError::UnknownName { kind: "emotion", name: s.to_string() })
    }
}

/// A user intent coming from the keyboard, a voice transcript or a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Emotion(Emotion),
    Blink,
    ToggleCyclops,
    ToggleSweat,
    ToggleCurious,
    /// Toggle idle wander with a 2 s interval and 3 s variation.
    ToggleIdle,
    ToggleAutoMode,
}

impl Command {
    /// `KeyboardEvent.key` to command. Letters are case-insensitive.
    pub fn from_key(key: &str) -> Option<Command> {
        let key = key.to_ascii_lowercase();
        let emotion = match key.as_str() {
            "1" => Emotion::Idle,
            "2" => Emotion::Happy,
            "3" => Emotion::Processing,
            "4" => Emotion::Alert,
            "5" => Emotion::Error,
            "6" => Emotion::Love,
            "7" => Emotion::Sleep,
            "8" => Emotion::Scan,
            "9" => Emotion::Tired,
            "0" => Emotion::Angry,
            "q" => Emotion::Confused,
            "w" => Emotion::Laugh,
            "b" => return Some(Command::Blink),
            "c" => return Some(Command::ToggleCyclops),
            "s" => return Some(Command::ToggleSweat),
            "i" => return Some(Command::ToggleIdle),
            " " | "spacebar" => return Some(Command::ToggleAutoMode),
            _ => return None,
        };
        Some(Command::Emotion(emotion))
    }

    /// Keyword match on a speech transcript. The first matching rule wins,
    /// and keywords match anywhere in the text ("interesting" contains "rest").
    pub fn from_transcript(text: &str) -> Option<Command> {
        const RULES: &[(&[&str], Command)] = &[
            (&["idle", "standby"], Command::Emotion(Emotion::Idle)),
            (&["happy", "smile", "good"], Command::Emotion(Emotion::Happy)),
            (&["process", "compute", "calculate"], Command::Emotion(Emotion::Processing)),
            (&["alert", "warning", "attention"], Command::Emotion(Emotion::Alert)),
            (&["error", "problem", "malfunction"], Command::Emotion(Emotion::Error)),
            (&["love", "heart", "affection"], Command::Emotion(Emotion::Love)),
            (&["sleep", "hibernate", "rest"], Command::Emotion(Emotion::Sleep)),
            (&["scan", "search", "analyze"], Command::Emotion(Emotion::Scan)),
            (&["tired", "exhausted"], Command::Emotion(Emotion::Tired)),
            (&["angry", "mad", "furious"], Command::Emotion(Emotion::Angry)),
            (&["confused", "puzzled"], Command::Emotion(Emotion::Confused)),
            (&["laugh", "funny", "hilarious"], Command::Emotion(Emotion::Laugh)),
            (&["blink", "wink"], Command::Blink),
            (&["cyclops", "one eye"], Command::ToggleCyclops),
            (&["sweat", "nervous"], Command::ToggleSweat),
            (&["curious", "curiosity"], Command::ToggleCurious),
            (&["auto", "automatic"], Command::ToggleAutoMode),
        ];
        let text = text.to_lowercase();
        RULES
            .iter()
            .find(|(words, _)| words.iter().any(|w| text.contains(w)))
            .map(|(_, cmd)| *cmd)
    }
}

/// Map a pointer offset from the canvas center (y down) to a gaze direction.
/// Returns `None` inside the dead zone.
pub fn gaze_from_pointer(dx: f64, dy: f64) -> Option<Position> {
    if dx.hypot(dy) <= GAZE_DEAD_ZONE {
        return None;
    }
    let degrees = (dy.atan2(dx).to_degrees() + 360.0) % 360.0;
    let position = match degrees {
        d if !(22.5..337.5).contains(&d) => Position::E,
        d if d < 67.5 => Position::SE,
        d if d < 112.5 => Position::S,
        d if d < 157.5 => Position::SW,
        d if d < 202.5 => Position::W,
        d if d < 247.5 => Position::NW,
        d if d < 292.5 => Position::N,
        _ => Position::NE,
    };
    Some(position)
}

/// Cycles to a random different emotion at a fixed period while enabled.
#[derive(Clone, Debug)]
pub struct AutoMode {
    timer: ScheduledTimer,
}

impl AutoMode {
    pub fn new() -> Self {
        Self { timer: ScheduledTimer::new(AUTO_MODE_INTERVAL_S, 0.0) }
    }

    pub fn is_enabled(&self) -> bool {
        self.timer.enabled
    }

    /// Enabling schedules the first switch one full period after `now`.
    pub fn set_enabled(&mut self, enabled: bool, now: f64) {
        self.timer.enabled = enabled;
        if enabled {
            self.timer.fires_at = now + self.timer.interval_ms;
        }
    }

    pub fn poll<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        current: Emotion,
        rng: &mut R,
    ) -> Option<Emotion> {
        if !self.timer.poll(now, rng) {
            return None;
        }
        let others: Vec<Emotion> = Emotion::ALL.into_iter().filter(|e| *e != current).collect();
        Some(others[rng.gen_range(0..others.len())])
    }
}

impl Default for AutoMode {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns an animator plus the page-level state around it: the active emotion
/// and auto mode.
pub struct FaceController<S: Surface> {
    eyes: EyeAnimator<S>,
    emotion: Emotion,
    auto: AutoMode,
    rng: SmallRng,
}

impl<S: Surface> FaceController<S> {
    pub fn new(eyes: EyeAnimator<S>) -> Self {
        Self::with_seed(eyes, entropy_seed())
    }

    pub fn with_seed(eyes: EyeAnimator<S>, seed: u64) -> Self {
        let mut controller = Self {
            eyes,
            emotion: Emotion::Idle,
            auto: AutoMode::new(),
            rng: SmallRng::seed_from_u64(seed),
        };
        controller.set_emotion(Emotion::Idle);
        controller
    }

    pub fn set_emotion(&mut self, emotion: Emotion) {
        debug!(%emotion, "emotion");
        emotion.apply(&mut self.eyes);
        self.emotion = emotion;
    }

    pub fn run(&mut self, command: Command, now: f64) {
        match command {
            Command::Emotion(e) => self.set_emotion(e),
            Command::Blink => self.eyes.blink(),
            Command::ToggleCyclops => {
                let on = !self.eyes.is_cyclops();
                self.eyes.set_cyclops(on);
            }
            Command::ToggleSweat => {
                let on = !self.eyes.is_sweating();
                self.eyes.set_sweat(on);
            }
            Command::ToggleCurious => {
                let on = !self.eyes.is_curious();
                self.eyes.set_curious(on);
            }
            Command::ToggleIdle => {
                let on = !self.eyes.idle_wander().enabled;
                self.eyes.set_idle_wander(on, 2.0, 3.0);
            }
            Command::ToggleAutoMode => {
                let on = !self.auto.is_enabled();
                self.auto.set_enabled(on, now);
                info!(enabled = on, "auto mode");
            }
        }
    }

    /// Returns whether the key was bound to a command.
    pub fn handle_key(&mut self, key: &str, now: f64) -> bool {
        match Command::from_key(key) {
            Some(cmd) => {
                self.run(cmd, now);
                true
            }
            None => false,
        }
    }

    pub fn handle_transcript(&mut self, text: &str, now: f64) -> bool {
        match Command::from_transcript(text) {
            Some(cmd) => {
                self.run(cmd, now);
                true
            }
            None => false,
        }
    }

    /// Follow a pointer offset from the canvas center. Ignored in auto mode.
    pub fn look_toward(&mut self, dx: f64, dy: f64) {
        if self.auto.is_enabled() {
            return;
        }
        if let Some(position) = gaze_from_pointer(dx, dy) {
            self.eyes.set_gaze_position(position);
        }
    }

    /// Advance auto mode, then the animator. Returns whether a frame was drawn.
    pub fn tick(&mut self, now: f64) -> bool {
        if let Some(next) = self.auto.poll(now, self.emotion, &mut self.rng) {
            self.set_emotion(next);
        }
        self.eyes.tick(now)
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn auto_mode(&self) -> &AutoMode {
        &self.auto
    }

    pub fn eyes(&self) -> &EyeAnimator<S> {
        &self.eyes
    }

    pub fn eyes_mut(&mut self) -> &mut EyeAnimator<S> {
        &mut self.eyes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recorder;

    fn controller() -> FaceController<Recorder> {
        let mut eyes = EyeAnimator::with_seed(Recorder::new(), 2);
        eyes.initialize(200.0, 200.0, 50.0).unwrap();
        FaceController::with_seed(eyes, 2)
    }

    #[test]
    fn emotion_names_round_trip() {
        for e in Emotion::ALL {
            assert_eq!(e.name().parse::<Emotion>().unwrap(), e);
        }
        assert_eq!(" Happy ".parse::<Emotion>().unwrap(), Emotion::Happy);
        assert!("grumpy".parse::<Emotion>().is_err());
    }

    #[test]
    fn presets_reset_previous_effects() {
        let mut c = controller();
        c.set_emotion(Emotion::Alert);
        assert!(c.eyes().horizontal_flicker().enabled);
        assert_eq!(c.eyes().horizontal_flicker().amplitude, 8.0);
        c.eyes_mut().set_sweat(true);

        c.set_emotion(Emotion::Love);
        let eyes = c.eyes();
        assert_eq!(eyes.mood(), Mood::Happy);
        assert!(!eyes.horizontal_flicker().enabled);
        assert!(!eyes.is_sweating());
        assert_eq!(eyes.colors(), (Color::BACKGROUND, Color::rgb(0xff, 0x00, 0xaa)));
    }

    #[test]
    fn idle_wander_presets() {
        let mut c = controller();
        c.set_emotion(Emotion::Scan);
        assert!(c.eyes().idle_wander().enabled);
        assert_eq!(c.eyes().idle_wander().interval_ms, 500.0);
        c.set_emotion(Emotion::Angry);
        assert!(c.eyes().idle_wander().enabled, "only idle turns wander off");
        c.set_emotion(Emotion::Idle);
        assert!(!c.eyes().idle_wander().enabled);
    }

    #[test]
    fn laugh_and_confused_arm_pulses() {
        let mut c = controller();
        c.set_emotion(Emotion::Laugh);
        assert!(c.eyes().laugh_pulse().is_active());
        assert_eq!(c.eyes().mood(), Mood::Happy);
        c.set_emotion(Emotion::Confused);
        assert!(c.eyes().confused_pulse().is_active());
        assert_eq!(c.eyes().mood(), Mood::Default);
    }

    #[test]
    fn key_bindings() {
        assert_eq!(Command::from_key("5"), Some(Command::Emotion(Emotion::Error)));
        assert_eq!(Command::from_key("Q"), Some(Command::Emotion(Emotion::Confused)));
        assert_eq!(Command::from_key(" "), Some(Command::ToggleAutoMode));
        assert_eq!(Command::from_key("c"), Some(Command::ToggleCyclops));
        assert_eq!(Command::from_key("x"), None);
    }

    #[test]
    fn transcript_rules_are_ordered() {
        assert_eq!(
            Command::from_transcript("Please look HAPPY"),
            Some(Command::Emotion(Emotion::Happy))
        );
        // "good" matches before "error".
        assert_eq!(
            Command::from_transcript("good error"),
            Some(Command::Emotion(Emotion::Happy))
        );
        assert_eq!(Command::from_transcript("go to one eye mode"), Some(Command::ToggleCyclops));
        assert_eq!(Command::from_transcript("hello there"), None);
    }

    #[test]
    fn pointer_buckets() {
        assert_eq!(gaze_from_pointer(10.0, 10.0), None);
        assert_eq!(gaze_from_pointer(100.0, 0.0), Some(Position::E));
        assert_eq!(gaze_from_pointer(100.0, -30.0), Some(Position::E));
        assert_eq!(gaze_from_pointer(100.0, 100.0), Some(Position::SE));
        assert_eq!(gaze_from_pointer(0.0, 100.0), Some(Position::S));
        assert_eq!(gaze_from_pointer(-100.0, 0.0), Some(Position::W));
        assert_eq!(gaze_from_pointer(0.0, -100.0), Some(Position::N));
        assert_eq!(gaze_from_pointer(100.0, -100.0), Some(Position::NE));
        assert_eq!(gaze_from_pointer(-100.0, -100.0), Some(Position::NW));
    }

    #[test]
    fn auto_mode_switches_every_period() {
        let mut c = controller();
        c.run(Command::ToggleAutoMode, 1000.0);
        assert!(c.auto_mode().is_enabled());
        c.tick(4999.0);
        assert_eq!(c.emotion(), Emotion::Idle);
        c.tick(5000.0);
        assert_ne!(c.emotion(), Emotion::Idle);
        let first = c.emotion();
        c.tick(9000.0);
        assert_ne!(c.emotion(), first);
    }

    #[test]
    fn pointer_is_ignored_in_auto_mode() {
        let mut c = controller();
        c.run(Command::ToggleAutoMode, 0.0);
        let x = c.eyes().left().x.next;
        c.look_toward(-200.0, 0.0);
        assert_eq!(c.eyes().left().x.next, x);
        c.run(Command::ToggleAutoMode, 0.0);
        c.look_toward(-200.0, 0.0);
        assert_eq!(c.eyes().left().x.next, 0.0);
    }

    #[test]
    fn toggles_flip_animator_flags() {
        let mut c = controller();
        assert!(c.handle_key("s", 0.0));
        assert!(c.eyes().is_sweating());
        assert!(c.handle_transcript("I'm nervous", 0.0));
        assert!(!c.eyes().is_sweating());
        assert!(c.handle_key("i", 0.0));
        assert_eq!(c.eyes().idle_wander().interval_ms, 2000.0);
        assert!(!c.handle_key("z", 0.0));
    }

    #[test]
    fn curiosity_toggles_from_button_and_voice() {
        let mut c = controller();
        let was = c.eyes().is_curious();
        c.run(Command::ToggleCurious, 0.0);
        assert_eq!(c.eyes().is_curious(), !was);
        assert_eq!(Command::from_transcript("be curious"), Some(Command::ToggleCurious));
        assert!(c.handle_transcript("more curiosity please", 0.0));
        assert_eq!(c.eyes().is_curious(), was);
    }
}

//! Per-tick state advance. Order matters: heights ease before positions so
//! the vertical re-centering uses the freshly eased height, and the right
//! eye's target is derived from the left eye only after the left has moved.

use rand::Rng;
use tracing::debug;

use super::{
    CLOSED_HEIGHT, CONFUSED_AMPLITUDE, CURIOUS_BOOST, CURIOUS_MARGIN, EyeAnimator, LAUGH_AMPLITUDE,
};
use crate::eased::js_round;
use crate::surface::Surface;
use crate::timer::PulsePhase;

impl<S: Surface> EyeAnimator<S> {
    /// Advance and redraw one frame if at least one frame interval has passed
    /// since the last drawn frame. Returns whether a frame was drawn.
    ///
    /// `now` is a wall-clock timestamp in milliseconds (e.g. `performance.now()`).
    pub fn tick(&mut self, now: f64) -> bool {
        if let Some(last) = self.last_frame_at {
            if now - last < self.frame_interval_ms {
                return false;
            }
        }
        self.last_frame_at = Some(now);
        self.step(now);
        self.compose();
        true
    }

    fn step(&mut self, now: f64) {
        self.apply_curiosity();
        self.ease_heights();
        self.spring_back();
        self.ease_geometry();
        self.ease_positions();
        self.run_macro_animations(now);
        self.apply_flicker();
        if self.cyclops {
            self.right.width.current = 0.0;
            self.right.height.current = 0.0;
            self.spacing.current = 0.0;
        }
    }

    /// Widen an eye whose gaze target sits at the edge of its travel.
    ///
    /// The two eyes are measured asymmetrically on purpose. The left eye uses
    /// the travel range: its left edge, plus its right edge in cyclops mode.
    /// The right eye compares last tick's derived target against
    /// `screen_width - right width`, so an oversized pair boosts it even
    /// while centered.
    fn apply_curiosity(&mut self) {
        if !self.curious {
            self.left.height_offset = 0.0;
            self.right.height_offset = 0.0;
            return;
        }
        let travel_x = self.travel_x();
        let left_at_edge = self.left.x.next <= CURIOUS_MARGIN
            || (self.cyclops && self.left.x.next >= travel_x - CURIOUS_MARGIN);
        self.left.height_offset = if left_at_edge { CURIOUS_BOOST } else { 0.0 };

        let right_extreme = self.screen_width - self.right.width.current - CURIOUS_MARGIN;
        self.right.height_offset =
            if self.right.x.next >= right_extreme { CURIOUS_BOOST } else { 0.0 };
    }

    fn ease_heights(&mut self) {
        for eye in [&mut self.left, &mut self.right] {
            let offset = eye.height_offset;
            eye.height.advance_with(offset);
            eye.y.nudge(js_round((eye.height.default - eye.height.current) / 2.0));
            eye.y.nudge(-js_round(offset / 2.0));
        }
    }

    fn spring_back(&mut self) {
        for eye in [&mut self.left, &mut self.right] {
            if eye.open && eye.height.current <= CLOSED_HEIGHT + eye.height_offset {
                eye.height.reset_to_default();
            }
        }
    }

    fn ease_geometry(&mut self) {
        self.left.width.advance();
        self.right.width.advance();
        self.spacing.advance();
        self.left.radius.advance();
        self.right.radius.advance();
    }

    fn ease_positions(&mut self) {
        self.left.x.advance();
        self.left.y.advance();
        self.right
            .x
            .set_target(self.left.x.next + self.left.width.current + self.spacing.current);
        self.right.y.set_target(self.left.y.next);
        self.right.x.advance();
        self.right.y.advance();
    }

    fn run_macro_animations(&mut self, now: f64) {
        if self.autoblink.poll(now, &mut self.rng) {
            self.blink();
        }

        match self.laugh.poll(now) {
            PulsePhase::Started => {
                debug!(now, "laugh pulse started");
                self.v_flicker.set(true, LAUGH_AMPLITUDE);
            }
            PulsePhase::Finished => {
                debug!(now, "laugh pulse finished");
                self.v_flicker.set(false, 0.0);
            }
            PulsePhase::Idle | PulsePhase::Running => {}
        }

        match self.confused.poll(now) {
            PulsePhase::Started => {
                debug!(now, "confused pulse started");
                self.h_flicker.set(true, CONFUSED_AMPLITUDE);
            }
            PulsePhase::Finished => {
                debug!(now, "confused pulse finished");
                self.h_flicker.set(false, 0.0);
            }
            PulsePhase::Idle | PulsePhase::Running => {}
        }

        if self.idle.poll(now, &mut self.rng) {
            let x = self.rng.r#gen::<f64>() * self.travel_x();
            let y = self.rng.r#gen::<f64>() * self.travel_y();
            self.left.x.set_target(x);
            self.left.y.set_target(y);
        }
    }

    fn apply_flicker(&mut self) {
        if let Some(dx) = self.h_flicker.shift() {
            self.left.x.nudge(dx);
            self.right.x.nudge(dx);
        }
        if let Some(dy) = self.v_flicker.shift() {
            self.left.y.nudge(dy);
            self.right.y.nudge(dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::animator::EyeAnimator;
    use crate::mood::Position;
    use crate::surface::Recorder;

    fn animator() -> EyeAnimator<Recorder> {
        let mut a = EyeAnimator::with_seed(Recorder::new(), 9);
        a.initialize(320.0, 320.0, 50.0).unwrap();
        a
    }

    /// Tick `n` frames 20 ms apart starting at `t`; returns the next free time.
    fn run(a: &mut EyeAnimator<Recorder>, t: f64, n: usize) -> f64 {
        let mut now = t;
        for _ in 0..n {
            assert!(a.tick(now));
            now += 20.0;
        }
        now
    }

    #[test]
    fn second_tick_inside_interval_is_a_noop() {
        let mut a = animator();
        assert!(a.tick(1000.0));
        let frames = a.surface().frames();
        assert!(!a.tick(1010.0));
        assert_eq!(a.surface().frames(), frames);
        assert!(a.tick(1020.0));
    }

    #[test]
    fn closing_eye_stays_closed_and_keeps_center() {
        let mut a = animator();
        let center = a.left().y.current + a.left().height.current / 2.0;
        a.close_eyes();
        run(&mut a, 1000.0, 12);
        // Rounding parks the height one pixel above the target.
        assert_eq!(a.left().height.current, 2.0);
        assert_eq!(a.left().height.next, 1.0);
        let new_center = a.left().y.current + a.left().height.current / 2.0;
        assert!((new_center - center).abs() <= 2.0, "{center} vs {new_center}");
    }

    #[test]
    fn open_eye_springs_back_after_collapsing() {
        let mut a = animator();
        a.set_eye_height(1.0, 1.0);
        run(&mut a, 1000.0, 12);
        // Height collapses toward 1 then the open flag pulls it back to default.
        assert!(a.left().open);
        assert!(a.left().height.current <= 2.0);
        a.set_eye_height(150.0, 150.0);
        run(&mut a, 2000.0, 12);
        assert_eq!(a.left().height.current, 150.0);
    }

    #[test]
    fn spring_back_restores_default_target() {
        let mut a = animator();
        a.left.height.current = 1.0;
        a.left.height.next = 1.0;
        a.left.height.default = 150.0;
        a.tick(1000.0);
        assert_eq!(a.left().height.next, 150.0);
    }

    #[test]
    fn right_eye_follows_left_target() {
        let mut a = animator();
        a.set_gaze_position(Position::NE);
        a.tick(1000.0);
        assert_eq!(
            a.right().x.next,
            a.left().x.next + a.left().width.current + a.spacing().current
        );
        assert_eq!(a.right().y.next, a.left().y.next);
    }

    #[test]
    fn curious_gaze_boosts_edge_eye() {
        let mut a = animator();
        a.set_curious(true);
        a.set_gaze_position(Position::W);
        a.tick(1000.0);
        assert_eq!(a.left().height_offset, 16.0);
        assert_eq!(a.left().height.current, 158.0);
        a.set_curious(false);
        a.tick(1020.0);
        assert_eq!(a.left().height_offset, 0.0);
    }

    #[test]
    fn curious_boost_lifts_eye_to_stay_centered() {
        let mut calm = animator();
        calm.set_gaze_position(Position::W);
        calm.tick(1000.0);
        assert_eq!(calm.left().y.current, 85.0);

        let mut a = animator();
        a.set_curious(true);
        a.set_gaze_position(Position::W);
        a.tick(1000.0);
        // 85 - 4 (height re-centering) - 8 (half the boost), then eased toward 85.
        assert_eq!(a.left().y.current, 79.0);
    }

    #[test]
    fn curious_right_eye_boosts_a_tick_after_reaching_edge() {
        let mut a = animator();
        a.set_eye_size(60.0, 60.0);
        a.set_spacing(20.0);
        let t = run(&mut a, 1000.0, 20);
        a.set_curious(true);
        a.set_gaze_position(Position::W);
        let t = run(&mut a, t, 2);
        assert_eq!(a.right().height_offset, 0.0);

        // Travel is 320 - 61 - 21 - 61; the right target becomes 177 + 61 + 21.
        a.set_gaze_position(Position::NE);
        let t = run(&mut a, t, 1);
        assert_eq!(a.right().x.next, 259.0);
        assert_eq!(a.right().height_offset, 0.0);
        run(&mut a, t, 1);
        assert_eq!(a.right().height_offset, 16.0);
        assert_eq!(a.left().height_offset, 0.0);
    }

    #[test]
    fn oversized_pair_boosts_right_eye_anywhere_past_its_extreme() {
        let mut a = animator();
        a.set_curious(true);
        a.set_gaze_position(Position::NE);
        run(&mut a, 1000.0, 2);
        assert_eq!(a.right().x.next, 170.0);
        assert_eq!(a.right().height_offset, 16.0);
    }

    #[test]
    fn curious_cyclops_boosts_at_right_edge() {
        for cyclops in [false, true] {
            let mut a = animator();
            a.set_eye_size(60.0, 60.0);
            a.set_spacing(20.0);
            a.set_cyclops(cyclops);
            let t = run(&mut a, 1000.0, 20);
            a.set_curious(true);
            a.set_gaze_position(Position::E);
            run(&mut a, t, 1);
            let (offset, height) = if cyclops { (16.0, 158.0) } else { (0.0, 150.0) };
            assert_eq!(a.left().height_offset, offset, "cyclops = {cyclops}");
            assert_eq!(a.left().height.current, height, "cyclops = {cyclops}");
        }
    }

    #[test]
    fn laugh_pulse_flickers_for_half_a_second() {
        let mut a = animator();
        a.play_laugh_pulse();
        a.tick(1000.0);
        assert!(a.vertical_flicker().enabled);
        assert_eq!(a.vertical_flicker().amplitude, 10.0);
        a.play_laugh_pulse();
        a.tick(1480.0);
        assert!(a.vertical_flicker().enabled);
        a.tick(1500.0);
        assert!(!a.vertical_flicker().enabled);
        assert!(!a.laugh_pulse().is_active());
    }

    #[test]
    fn confused_pulse_shakes_horizontally() {
        let mut a = animator();
        a.play_confused_pulse();
        let x0 = a.left().x.current;
        a.tick(1000.0);
        assert!(a.horizontal_flicker().enabled);
        assert_eq!(a.horizontal_flicker().amplitude, 40.0);
        assert_eq!(a.left().x.current, x0 - 40.0);
        a.tick(1500.0);
        assert!(!a.horizontal_flicker().enabled);
    }

    #[test]
    fn idle_wander_picks_target_inside_travel() {
        let mut a = animator();
        a.set_eye_size(60.0, 60.0);
        a.set_spacing(20.0);
        run(&mut a, 1000.0, 20);
        a.set_idle_wander(true, 1.0, 3.0);
        a.tick(5000.0);
        let (tx, ty) = (a.travel_x(), a.travel_y());
        assert!(tx > 0.0);
        assert!((0.0..=tx).contains(&a.left().x.next));
        assert!((0.0..=ty).contains(&a.left().y.next));
        assert!(a.idle_wander().fires_at >= 6000.0 && a.idle_wander().fires_at < 9000.0);
    }

    #[test]
    fn autoblink_reschedules_after_firing() {
        let mut a = animator();
        a.set_auto_blink(true, 2.0, 3.0);
        a.tick(1000.0);
        let due = a.auto_blink().fires_at;
        assert!((3000.0..6000.0).contains(&due));
        assert!(a.left().open && a.right().open);
    }
}

//! Wall-clock timers for the macro animations (autoblink, idle wander,
//! laugh / confused pulses). They are polled at the top of each tick; there is
//! no timer thread, so an overdue timer fires on the next poll.

use rand::Rng;

/// Repeating timer with a randomized `[interval, interval + variation)` window.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTimer {
    pub enabled: bool,
    pub interval_ms: f64,
    pub variation_ms: f64,
    /// Next fire time (ms). Zero means due on the first poll.
    pub fires_at: f64,
}

impl ScheduledTimer {
    pub fn new(interval_s: f64, variation_s: f64) -> Self {
        Self {
            enabled: false,
            interval_ms: secs_to_ms(interval_s),
            variation_ms: secs_to_ms(variation_s),
            fires_at: 0.0,
        }
    }

    pub fn configure(&mut self, enabled: bool, interval_s: f64, variation_s: f64) {
        self.enabled = enabled;
        self.interval_ms = secs_to_ms(interval_s);
        self.variation_ms = secs_to_ms(variation_s);
    }

    /// Returns true (and reschedules) when the timer is enabled and due.
    pub fn poll<R: Rng + ?Sized>(&mut self, now: f64, rng: &mut R) -> bool {
        if !self.enabled || now < self.fires_at {
            return false;
        }
        self.fires_at = now + self.interval_ms + rng.r#gen::<f64>() * self.variation_ms;
        true
    }
}

fn secs_to_ms(s: f64) -> f64 {
    if s.is_finite() { s.max(0.0) * 1000.0 } else { 0.0 }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PulsePhase {
    Idle,
    /// First poll after arming; the effect should be switched on.
    Started,
    Running,
    /// Duration elapsed; the effect should be switched off.
    Finished,
}

/// One-shot effect of fixed wall-clock duration. Re-arming while armed is a no-op.
#[derive(Clone, Debug, PartialEq)]
pub struct PulseTimer {
    pub armed: bool,
    pub started_at: Option<f64>,
    pub duration_ms: f64,
}

impl PulseTimer {
    pub const DEFAULT_DURATION_MS: f64 = 500.0;

    pub fn new(duration_ms: f64) -> Self {
        Self { armed: false, started_at: None, duration_ms }
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_active(&self) -> bool {
        self.armed
    }

    pub fn poll(&mut self, now: f64) -> PulsePhase {
        if !self.armed {
            return PulsePhase::Idle;
        }
        match self.started_at {
            None => {
                self.started_at = Some(now);
                PulsePhase::Started
            }
            Some(start) if now >= start + self.duration_ms => {
                self.armed = false;
                self.started_at = None;
                PulsePhase::Finished
            }
            Some(_) => PulsePhase::Running,
        }
    }
}

impl Default for PulseTimer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn scheduled_timer_fires_then_waits_inside_window() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut t = ScheduledTimer::new(1.0, 4.0);
        assert!(!t.poll(100.0, &mut rng), "disabled timer must not fire");
        t.configure(true, 1.0, 4.0);
        assert!(t.poll(100.0, &mut rng));
        assert!(t.fires_at >= 1100.0 && t.fires_at < 5100.0);
        assert!(!t.poll(1099.0, &mut rng));
    }

    #[test]
    fn overdue_timer_fires_once_on_next_poll() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut t = ScheduledTimer::new(1.0, 0.0);
        t.configure(true, 1.0, 0.0);
        assert!(t.poll(0.0, &mut rng));
        assert!(t.poll(60_000.0, &mut rng));
        assert_eq!(t.fires_at, 61_000.0);
        assert!(!t.poll(60_500.0, &mut rng));
    }

    #[test]
    fn pulse_runs_for_duration_and_ignores_rearm() {
        let mut p = PulseTimer::default();
        assert_eq!(p.poll(0.0), PulsePhase::Idle);
        p.arm();
        assert_eq!(p.poll(1000.0), PulsePhase::Started);
        p.arm();
        assert_eq!(p.poll(1200.0), PulsePhase::Running);
        assert_eq!(p.poll(1499.0), PulsePhase::Running);
        assert_eq!(p.poll(1500.0), PulsePhase::Finished);
        assert!(!p.is_active());
        assert_eq!(p.poll(1600.0), PulsePhase::Idle);
    }
}

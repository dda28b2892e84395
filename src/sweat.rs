//! Sweat / tear drop particles. Three drops fall along their own band of the
//! screen, swelling during the first half of the fall and tapering after.

use rand::Rng;

/// Width of the outer bands the left and right drops are anchored in.
const EDGE_BAND: f64 = 60.0;
const RESET_Y: f64 = 4.0;
const RESET_WIDTH: f64 = 2.0;
const RESET_HEIGHT: f64 = 4.0;
const FALL_MIN: f64 = 20.0;
const FALL_SPREAD: f64 = 20.0;
const WIDTH_TAPER: f64 = 0.5;
const HEIGHT_TAPER: f64 = 0.2;

pub const SWEAT_RADIUS: f64 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lane {
    Left,
    Center,
    Right,
}

impl Lane {
    fn pick_anchor<R: Rng + ?Sized>(self, rng: &mut R, screen_width: f64) -> f64 {
        let u = rng.r#gen::<f64>();
        match self {
            Lane::Left => u * EDGE_BAND,
            Lane::Center => EDGE_BAND + u * (screen_width - 2.0 * EDGE_BAND).max(0.0),
            Lane::Right => (screen_width - EDGE_BAND) + u * EDGE_BAND,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SweatDrop {
    pub lane: Lane,
    /// Horizontal center the drop falls along.
    pub anchor: f64,
    pub x: f64,
    pub y: f64,
    /// Fall ceiling for the current cycle.
    pub y_max: f64,
    pub width: f64,
    pub height: f64,
}

impl SweatDrop {
    /// A parked drop: its ceiling is zero so the first step resets it.
    pub fn new(lane: Lane) -> Self {
        Self {
            lane,
            anchor: RESET_Y,
            x: 0.0,
            y: RESET_Y,
            y_max: 0.0,
            width: RESET_WIDTH,
            height: RESET_HEIGHT,
        }
    }

    pub fn trio() -> [SweatDrop; 3] {
        [SweatDrop::new(Lane::Left), SweatDrop::new(Lane::Center), SweatDrop::new(Lane::Right)]
    }

    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, screen_width: f64) {
        if self.y <= self.y_max {
            self.y += 1.0;
        } else {
            self.anchor = self.lane.pick_anchor(rng, screen_width);
            self.y = RESET_Y;
            self.y_max = FALL_MIN + rng.r#gen::<f64>() * FALL_SPREAD;
            self.width = RESET_WIDTH;
            self.height = RESET_HEIGHT;
        }

        if self.y <= self.y_max / 2.0 {
            self.width += 1.0;
            self.height += 1.0;
        } else {
            self.width = (self.width - WIDTH_TAPER).max(0.0);
            self.height = (self.height - HEIGHT_TAPER).max(0.0);
        }
        self.x = self.anchor - self.width / 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn parked_drop_resets_on_first_step() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut d = SweatDrop::new(Lane::Left);
        d.step(&mut rng, 320.0);
        assert_eq!(d.y, RESET_Y);
        assert!(d.y_max >= 20.0 && d.y_max < 40.0);
        assert_eq!((d.width, d.height), (3.0, 5.0));
        assert!((0.0..60.0).contains(&d.anchor));
    }

    #[test]
    fn lanes_stay_in_their_band() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            assert!((0.0..60.0).contains(&Lane::Left.pick_anchor(&mut rng, 320.0)));
            assert!((60.0..260.0).contains(&Lane::Center.pick_anchor(&mut rng, 320.0)));
            assert!((260.0..320.0).contains(&Lane::Right.pick_anchor(&mut rng, 320.0)));
        }
    }

    #[test]
    fn drop_swells_then_tapers_width_faster() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut d = SweatDrop::new(Lane::Center);
        d.step(&mut rng, 320.0);
        let y_max = d.y_max;
        let (mut w, mut h) = (d.width, d.height);
        while d.y <= y_max {
            d.step(&mut rng, 320.0);
            if d.y == RESET_Y {
                break;
            }
            if d.y <= y_max / 2.0 {
                assert!(d.width > w && d.height > h);
            } else {
                assert!(d.width < w && d.height < h);
                assert!(w - d.width > h - d.height);
            }
            w = d.width;
            h = d.height;
            assert_eq!(d.x, d.anchor - d.width / 2.0);
        }
        assert!(d.y > y_max);
        d.step(&mut rng, 320.0);
        assert_eq!(d.y, RESET_Y);
    }
}

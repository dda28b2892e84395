//! Frame composition: eyes, mood eyelids, watery overlay and sweat drops,
//! painted back to front onto the surface.

use super::{Eye, EyeAnimator};
use crate::color::Color;
use crate::mood::Mood;
use crate::surface::Surface;
use crate::sweat::SWEAT_RADIUS;

const GLOSS_TOP: Color = Color::rgba(200, 230, 255, 0.35);
const GLOSS_BOTTOM: Color = Color::rgba(0, 90, 255, 0.35);
const HIGHLIGHT: Color = Color::rgba(255, 255, 255, 0.6);

type Point = (f64, f64);

impl<S: Surface> EyeAnimator<S> {
    pub(super) fn compose(&mut self) {
        self.ease_eyelids();

        self.surface.clear(self.background);
        draw_eye(&mut self.surface, &self.left, self.main);
        if self.right_visible() {
            draw_eye(&mut self.surface, &self.right, self.main);
        }

        self.draw_eyelids();

        if self.watery {
            draw_gloss(&mut self.surface, &self.left);
            if self.right_visible() {
                draw_gloss(&mut self.surface, &self.right);
            }
        }

        if self.sweat {
            let color = self.tear.unwrap_or(self.main);
            for drop in self.drops.iter_mut() {
                drop.step(&mut self.rng, self.screen_width);
                self.surface.fill_round_rect(
                    drop.x,
                    drop.y,
                    drop.width,
                    drop.height,
                    SWEAT_RADIUS,
                    color,
                );
            }
        }
    }

    fn right_visible(&self) -> bool {
        !self.cyclops && self.right.width.current > 0.0
    }

    /// Coverage targets follow the left eye's drawn height; only the active
    /// mood gets a non-zero target.
    fn ease_eyelids(&mut self) {
        let half = self.left.height.current / 2.0;
        let target = |on: bool| if on { half } else { 0.0 };
        self.eyelids.tired.set_target(target(self.mood == Mood::Tired));
        self.eyelids.angry.set_target(target(self.mood == Mood::Angry));
        self.eyelids.happy.set_target(target(self.mood == Mood::Happy));
        self.eyelids.tired.advance();
        self.eyelids.angry.advance();
        self.eyelids.happy.advance();
    }

    fn draw_eyelids(&mut self) {
        let bg = self.background;
        let tired = self.eyelids.tired.current;
        if tired > 0.0 {
            for tri in self.tired_lids(tired) {
                self.surface.fill_triangle(tri[0], tri[1], tri[2], bg);
            }
        }
        let angry = self.eyelids.angry.current;
        if angry > 0.0 {
            for tri in self.angry_lids(angry) {
                self.surface.fill_triangle(tri[0], tri[1], tri[2], bg);
            }
        }
        let happy = self.eyelids.happy.current;
        if happy > 0.0 {
            draw_happy_lid(&mut self.surface, &self.left, happy, bg);
            if self.right_visible() {
                draw_happy_lid(&mut self.surface, &self.right, happy, bg);
            }
        }
    }

    /// Tired lids droop toward the outer corners.
    fn tired_lids(&self, t: f64) -> Vec<[Point; 3]> {
        let (lx, ly, lw) = corner(&self.left);
        if self.cyclops {
            let mid = lx + lw / 2.0;
            return vec![
                [(lx, ly - 1.0), (mid, ly - 1.0), (lx, ly + t - 1.0)],
                [(mid, ly - 1.0), (lx + lw, ly - 1.0), (lx + lw, ly + t - 1.0)],
            ];
        }
        let (rx, ry, rw) = corner(&self.right);
        vec![
            [(lx, ly - 1.0), (lx + lw, ly - 1.0), (lx, ly + t - 1.0)],
            [(rx, ry - 1.0), (rx + rw, ry - 1.0), (rx + rw, ry + t - 1.0)],
        ]
    }

    /// Angry lids slope down toward the nose.
    fn angry_lids(&self, a: f64) -> Vec<[Point; 3]> {
        let (lx, ly, lw) = corner(&self.left);
        if self.cyclops {
            let mid = lx + lw / 2.0;
            return vec![
                [(lx, ly - 1.0), (mid, ly - 1.0), (mid, ly + a - 1.0)],
                [(mid, ly - 1.0), (lx + lw, ly - 1.0), (mid, ly + a - 1.0)],
            ];
        }
        let (rx, ry, rw) = corner(&self.right);
        vec![
            [(lx, ly - 1.0), (lx + lw, ly - 1.0), (lx + lw, ly + a - 1.0)],
            [(rx, ry - 1.0), (rx + rw, ry - 1.0), (rx, ry + a - 1.0)],
        ]
    }
}

fn corner(eye: &Eye) -> (f64, f64, f64) {
    (eye.x.current, eye.y.current, eye.width.current)
}

fn draw_eye<S: Surface>(surface: &mut S, eye: &Eye, color: Color) {
    surface.fill_round_rect(
        eye.x.current,
        eye.y.current,
        eye.width.current,
        eye.height.current,
        eye.radius.current,
        color,
    );
}

/// Background-colored rect rising from below the eye by `offset` pixels.
fn draw_happy_lid<S: Surface>(surface: &mut S, eye: &Eye, offset: f64, bg: Color) {
    surface.fill_round_rect(
        eye.x.current - 1.0,
        eye.y.current + eye.height.current - offset + 1.0,
        eye.width.current + 2.0,
        eye.height.default,
        eye.radius.current,
        bg,
    );
}

fn draw_gloss<S: Surface>(surface: &mut S, eye: &Eye) {
    let (x, y) = (eye.x.current, eye.y.current);
    let (w, h) = (eye.width.current, eye.height.current);
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    surface.fill_round_rect_gradient(x, y, w, h, eye.radius.current, GLOSS_TOP, GLOSS_BOTTOM);
    surface.fill_circle(x + w * 0.3, y + h * 0.25, w * 0.08, HIGHLIGHT);
    surface.fill_circle(x + w * 0.62, y + h * 0.4, w * 0.04, HIGHLIGHT);
}

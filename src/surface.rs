//! Drawing surface abstraction the animator renders into. Coordinates are
//! surface pixels, origin top-left, y down.

use crate::color::Color;

pub trait Surface {
    fn clear(&mut self, color: Color);

    fn fill_round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Color);

    fn fill_triangle(&mut self, p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), color: Color);

    /// Vertical gradient clipped to a rounded rect. Surfaces without gradient
    /// support fall back to a solid fill in the top color.
    #[allow(clippy::too_many_arguments)]
    fn fill_round_rect_gradient(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        top: Color,
        bottom: Color,
    ) {
        let _ = bottom;
        self.fill_round_rect(x, y, w, h, radius, top);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Color) {
        self.fill_round_rect(cx - r, cy - r, 2.0 * r, 2.0 * r, r, color);
    }
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn clear(&mut self, color: Color) {
        (**self).clear(color)
    }
    fn fill_round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Color) {
        (**self).fill_round_rect(x, y, w, h, radius, color)
    }
    fn fill_triangle(&mut self, p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), color: Color) {
        (**self).fill_triangle(p1, p2, p3, color)
    }
    fn fill_round_rect_gradient(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        top: Color,
        bottom: Color,
    ) {
        (**self).fill_round_rect_gradient(x, y, w, h, radius, top, bottom)
    }
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Color) {
        (**self).fill_circle(cx, cy, r, color)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    RoundRect { x: f64, y: f64, w: f64, h: f64, radius: f64, color: Color },
    Triangle { points: [(f64, f64); 3], color: Color },
    Gradient { x: f64, y: f64, w: f64, h: f64, radius: f64, top: Color, bottom: Color },
    Circle { cx: f64, cy: f64, r: f64, color: Color },
}

/// Headless surface that records every call. Each `clear` starts a new frame.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub commands: Vec<DrawCommand>,
    frames: usize,
    frame_start: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `clear` calls seen so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Commands issued since the most recent `clear` (inclusive).
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.commands[self.frame_start..]
    }

    pub fn reset(&mut self) {
        self.commands.clear();
        self.frames = 0;
        self.frame_start = 0;
    }

    /// Rounded rects of the last frame filled with `color`.
    pub fn round_rects_in(&self, color: Color) -> Vec<(f64, f64, f64, f64)> {
        self.last_frame()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::RoundRect { x, y, w, h, color: c, .. } if *c == color => {
                    Some((*x, *y, *w, *h))
                }
                _ => None,
            })
            .collect()
    }

    pub fn triangles(&self) -> Vec<[(f64, f64); 3]> {
        self.last_frame()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Triangle { points, .. } => Some(*points),
                _ => None,
            })
            .collect()
    }
}

impl Surface for Recorder {
    fn clear(&mut self, color: Color) {
        self.frames += 1;
        self.frame_start = self.commands.len();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Color) {
        self.commands.push(DrawCommand::RoundRect { x, y, w, h, radius, color });
    }

    fn fill_triangle(&mut self, p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), color: Color) {
        self.commands.push(DrawCommand::Triangle { points: [p1, p2, p3], color });
    }

    fn fill_round_rect_gradient(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        top: Color,
        bottom: Color,
    ) {
        self.commands.push(DrawCommand::Gradient { x, y, w, h, radius, top, bottom });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Color) {
        self.commands.push(DrawCommand::Circle { cx, cy, r, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SolidOnly(Vec<(f64, f64, f64, f64, f64)>);

    impl Surface for SolidOnly {
        fn clear(&mut self, _: Color) {}
        fn fill_round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, r: f64, _: Color) {
            self.0.push((x, y, w, h, r));
        }
        fn fill_triangle(&mut self, _: (f64, f64), _: (f64, f64), _: (f64, f64), _: Color) {}
    }

    #[test]
    fn optional_primitives_fall_back_to_round_rects() {
        let mut s = SolidOnly(Vec::new());
        s.fill_circle(10.0, 20.0, 5.0, Color::MAIN);
        s.fill_round_rect_gradient(1.0, 2.0, 3.0, 4.0, 1.0, Color::MAIN, Color::BACKGROUND);
        assert_eq!(s.0, vec![(5.0, 15.0, 10.0, 10.0, 5.0), (1.0, 2.0, 3.0, 4.0, 1.0)]);
    }

    #[test]
    fn recorder_tracks_frames() {
        let mut r = Recorder::new();
        r.clear(Color::BACKGROUND);
        r.fill_round_rect(0.0, 0.0, 1.0, 1.0, 0.0, Color::MAIN);
        r.clear(Color::BACKGROUND);
        r.fill_triangle((0.0, 0.0), (1.0, 0.0), (0.0, 1.0), Color::BACKGROUND);
        assert_eq!(r.frames(), 2);
        assert_eq!(r.last_frame().len(), 2);
        assert!(r.round_rects_in(Color::MAIN).is_empty());
        assert_eq!(r.triangles().len(), 1);
    }
}

//! `Surface` over a 2D canvas context.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::color::Color;
use crate::error::{EyesError, Result};
use crate::surface::Surface;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| EyesError::SurfaceUnavailable("2d context".into()))?;
        Ok(Self { canvas, ctx })
    }

    pub fn from_document(doc: &Document, canvas_id: &str) -> Result<Self> {
        let canvas = doc
            .get_element_by_id(canvas_id)
            .ok_or_else(|| EyesError::SurfaceUnavailable(format!("no element '{canvas_id}'")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| EyesError::SurfaceUnavailable(format!("'{canvas_id}' is not a canvas")))?;
        Self::new(canvas)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    /// Rounded-rect path; the radius is clamped so opposite corners never overlap.
    fn round_rect_path(&self, x: f64, y: f64, w: f64, h: f64, radius: f64) -> bool {
        if w <= 0.0 || h <= 0.0 {
            return false;
        }
        let r = radius.max(0.0).min(w / 2.0).min(h / 2.0);
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        ctx.arc_to(x + w, y, x + w, y + h, r).ok();
        ctx.arc_to(x + w, y + h, x, y + h, r).ok();
        ctx.arc_to(x, y + h, x, y, r).ok();
        ctx.arc_to(x, y, x + w, y, r).ok();
        ctx.close_path();
        true
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, color: Color) {
        let (w, h) = self.size();
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn fill_round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Color) {
        if self.round_rect_path(x, y, w, h, radius) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill();
        }
    }

    fn fill_triangle(&mut self, p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), color: Color) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(p1.0, p1.1);
        ctx.line_to(p2.0, p2.1);
        ctx.line_to(p3.0, p3.1);
        ctx.close_path();
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill();
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
        if !self.round_rect_path(x, y, w, h, radius) {
            return;
        }
        let ctx = &self.ctx;
        let gradient = ctx.create_linear_gradient(x, y, x, y + h);
        if gradient.add_color_stop(0.0, &top.to_css()).is_err()
            || gradient.add_color_stop(1.0, &bottom.to_css()).is_err()
        {
            return;
        }
        ctx.save();
        ctx.clip();
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(x, y, w, h);
        ctx.restore();
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Color) {
        if r <= 0.0 {
            return;
        }
        let ctx = &self.ctx;
        ctx.begin_path();
        if ctx.arc(cx, cy, r, 0.0, TAU).is_ok() {
            ctx.set_fill_style_str(&color.to_css());
            ctx.fill();
        }
    }
}

//! Browser bindings: a canvas-backed surface, the `RoboEyes` class exported to
//! JavaScript, and the self-running page controller.

mod canvas;
mod page;

pub use canvas::CanvasSurface;
pub use page::start_robot_eyes;

use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::animator::{
    AUTOBLINK_INTERVAL_S, AUTOBLINK_VARIATION_S, EyeAnimator, H_FLICKER_AMPLITUDE,
    IDLE_INTERVAL_S, IDLE_VARIATION_S, V_FLICKER_AMPLITUDE, check_screen,
};
use crate::color::Color;
use crate::emotion::{Emotion, FaceController};
use crate::error::EyesError;
use crate::mood::{Mood, Position};

pub(crate) fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub(crate) fn document() -> Result<web_sys::Document, EyesError> {
    window()
        .and_then(|w| w.document())
        .ok_or_else(|| EyesError::SurfaceUnavailable("no document".into()))
}

/// Animated eyes bound to a `<canvas>`. Call `update()` from a
/// `requestAnimationFrame` loop.
#[wasm_bindgen]
pub struct RoboEyes {
    face: FaceController<CanvasSurface>,
}

#[wasm_bindgen]
impl RoboEyes {
    /// Bind to the canvas with id `canvas_id`, sized from its width/height
    /// attributes, at 50 fps.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<RoboEyes, JsValue> {
        let surface = CanvasSurface::from_document(&document()?, canvas_id)?;
        let (w, h) = surface.size();
        let mut eyes = EyeAnimator::new(surface);
        eyes.initialize(w, h, crate::animator::DEFAULT_FRAME_RATE)?;
        Ok(RoboEyes { face: FaceController::new(eyes) })
    }

    /// Resize the canvas and re-initialize. Rejected arguments leave the
    /// canvas untouched.
    pub fn begin(&mut self, width: f64, height: f64, frame_rate: f64) -> Result<(), JsValue> {
        check_screen(width, height, frame_rate)?;
        let canvas = self.face.eyes().surface().canvas();
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        Ok(self.face.eyes_mut().initialize(width, height, frame_rate)?)
    }

    /// Tick against `performance.now()`. Returns whether a frame was drawn.
    pub fn update(&mut self) -> bool {
        self.face.tick(now_ms())
    }

    pub fn tick(&mut self, now: f64) -> bool {
        self.face.tick(now)
    }

    #[wasm_bindgen(js_name = setFramerate)]
    pub fn set_framerate(&mut self, fps: f64) -> Result<(), JsValue> {
        Ok(self.face.eyes_mut().set_frame_rate(fps)?)
    }

    #[wasm_bindgen(js_name = setDisplayColors)]
    pub fn set_display_colors(&mut self, background: &str, main: &str) -> Result<(), JsValue> {
        let bg: Color = background.parse()?;
        let main: Color = main.parse()?;
        self.face.eyes_mut().set_display_colors(bg, main);
        Ok(())
    }

    #[wasm_bindgen(js_name = setWidth)]
    pub fn set_width(&mut self, left: f64, right: f64) {
        self.face.eyes_mut().set_eye_size(left, right);
    }

    #[wasm_bindgen(js_name = setHeight)]
    pub fn set_height(&mut self, left: f64, right: f64) {
        self.face.eyes_mut().set_eye_height(left, right);
    }

    #[wasm_bindgen(js_name = setBorderradius)]
    pub fn set_border_radius(&mut self, left: f64, right: f64) {
        self.face.eyes_mut().set_corner_radius(left, right);
    }

    #[wasm_bindgen(js_name = setSpacebetween)]
    pub fn set_space_between(&mut self, px: f64) {
        self.face.eyes_mut().set_spacing(px);
    }

    #[wasm_bindgen(js_name = setMood)]
    pub fn set_mood(&mut self, mood: &str) -> Result<(), JsValue> {
        let mood: Mood = mood.parse()?;
        self.face.eyes_mut().set_mood(mood);
        Ok(())
    }

    #[wasm_bindgen(js_name = setPosition)]
    pub fn set_position(&mut self, position: &str) -> Result<(), JsValue> {
        let position: Position = position.parse()?;
        self.face.eyes_mut().set_gaze_position(position);
        Ok(())
    }

    #[wasm_bindgen(js_name = setAutoblinker)]
    pub fn set_autoblinker(&mut self, enabled: bool, interval: Option<f64>, variation: Option<f64>) {
        self.face.eyes_mut().set_auto_blink(
            enabled,
            interval.unwrap_or(AUTOBLINK_INTERVAL_S),
            variation.unwrap_or(AUTOBLINK_VARIATION_S),
        );
    }

    #[wasm_bindgen(js_name = setIdleMode)]
    pub fn set_idle_mode(&mut self, enabled: bool, interval: Option<f64>, variation: Option<f64>) {
        self.face.eyes_mut().set_idle_wander(
            enabled,
            interval.unwrap_or(IDLE_INTERVAL_S),
            variation.unwrap_or(IDLE_VARIATION_S),
        );
    }

    #[wasm_bindgen(js_name = setCuriosity)]
    pub fn set_curiosity(&mut self, curious: bool) {
        self.face.eyes_mut().set_curious(curious);
    }

    #[wasm_bindgen(js_name = setCyclops)]
    pub fn set_cyclops(&mut self, cyclops: bool) {
        self.face.eyes_mut().set_cyclops(cyclops);
    }

    #[wasm_bindgen(js_name = setHFlicker)]
    pub fn set_h_flicker(&mut self, enabled: bool, amplitude: Option<f64>) {
        self.face
            .eyes_mut()
            .set_horizontal_flicker(enabled, amplitude.unwrap_or(H_FLICKER_AMPLITUDE));
    }

    #[wasm_bindgen(js_name = setVFlicker)]
    pub fn set_v_flicker(&mut self, enabled: bool, amplitude: Option<f64>) {
        self.face
            .eyes_mut()
            .set_vertical_flicker(enabled, amplitude.unwrap_or(V_FLICKER_AMPLITUDE));
    }

    #[wasm_bindgen(js_name = setSweat)]
    pub fn set_sweat(&mut self, sweat: bool) {
        self.face.eyes_mut().set_sweat(sweat);
    }

    /// `null` / `undefined` restores drawing drops in the main color.
    #[wasm_bindgen(js_name = setTearColor)]
    pub fn set_tear_color(&mut self, color: Option<String>) -> Result<(), JsValue> {
        let color = color.map(|c| c.parse::<Color>()).transpose()?;
        self.face.eyes_mut().set_tear_color(color);
        Ok(())
    }

    #[wasm_bindgen(js_name = setWateryEyes)]
    pub fn set_watery_eyes(&mut self, watery: bool) {
        self.face.eyes_mut().set_watery_eyes(watery);
    }

    pub fn close(&mut self) {
        self.face.eyes_mut().close_eyes();
    }

    pub fn open(&mut self) {
        self.face.eyes_mut().open_eyes();
    }

    pub fn blink(&mut self) {
        self.face.eyes_mut().blink();
    }

    #[wasm_bindgen(js_name = closeEye)]
    pub fn close_eye(&mut self, left: bool, right: bool) {
        self.face.eyes_mut().close_eye(left, right);
    }

    #[wasm_bindgen(js_name = openEye)]
    pub fn open_eye(&mut self, left: bool, right: bool) {
        self.face.eyes_mut().open_eye(left, right);
    }

    #[wasm_bindgen(js_name = blinkEye)]
    pub fn blink_eye(&mut self, left: bool, right: bool) {
        self.face.eyes_mut().blink_eye(left, right);
    }

    #[wasm_bindgen(js_name = animConfused)]
    pub fn anim_confused(&mut self) {
        self.face.eyes_mut().play_confused_pulse();
    }

    #[wasm_bindgen(js_name = animLaugh)]
    pub fn anim_laugh(&mut self) {
        self.face.eyes_mut().play_laugh_pulse();
    }

    #[wasm_bindgen(js_name = getScreenConstraintX)]
    pub fn screen_constraint_x(&self) -> f64 {
        self.face.eyes().travel_x()
    }

    #[wasm_bindgen(js_name = getScreenConstraintY)]
    pub fn screen_constraint_y(&self) -> f64 {
        self.face.eyes().travel_y()
    }

    #[wasm_bindgen(js_name = setEmotion)]
    pub fn set_emotion(&mut self, name: &str) -> Result<(), JsValue> {
        let emotion: Emotion = name.parse()?;
        self.face.set_emotion(emotion);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn emotion(&self) -> String {
        self.face.emotion().to_string()
    }

    /// Run the command bound to a `KeyboardEvent.key`. Returns false if unbound.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> bool {
        self.face.handle_key(key, now_ms())
    }

    #[wasm_bindgen(js_name = handleTranscript)]
    pub fn handle_transcript(&mut self, text: &str) -> bool {
        self.face.handle_transcript(text, now_ms())
    }

    /// Aim at a pointer offset (CSS pixels) from the canvas center.
    #[wasm_bindgen(js_name = lookToward)]
    pub fn look_toward(&mut self, dx: f64, dy: f64) {
        self.face.look_toward(dx, dy);
    }
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
impl RoboEyes {
    /// Apply a JSON `EyeConfig` document.
    pub fn configure(&mut self, json: &str) -> Result<(), JsValue> {
        let config = crate::config::EyeConfig::from_json(json)?;
        let canvas = self.face.eyes().surface().canvas();
        canvas.set_width(config.width as u32);
        canvas.set_height(config.height as u32);
        Ok(config.apply(self.face.eyes_mut())?)
    }
}

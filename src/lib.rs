//! Robo Eyes core crate.
//!
//! A pair of expressive robot eyes drawn from rounded rectangles. The
//! [`EyeAnimator`] eases every geometric quantity halfway toward its target
//! each frame and composes mood eyelids, flicker, sweat and gloss on top. It
//! renders into any [`Surface`]; the browser build binds it to a `<canvas>`
//! through [`web::RoboEyes`] or the self-running [`web::start_robot_eyes`].

use wasm_bindgen::prelude::*;

pub mod animator;
pub mod color;
pub mod config;
pub mod eased;
pub mod emotion;
pub mod error;
pub mod mood;
pub mod surface;
pub mod sweat;
pub mod timer;
pub mod web;

pub use animator::{Eye, EyeAnimator, Eyelids, Flicker};
pub use color::Color;
pub use config::EyeConfig;
pub use eased::EasedScalar;
pub use emotion::{AutoMode, Command, Emotion, FaceController, gaze_from_pointer};
pub use error::{EyesError, Result};
pub use mood::{Mood, Position};
pub use surface::{DrawCommand, Recorder, Surface};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::set_as_global_default();
}

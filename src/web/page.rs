//! Self-running page: binds a canvas, drives it from requestAnimationFrame and
//! routes pointer, touch and keyboard input into the face controller.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent, window};

use super::{CanvasSurface, document, now_ms};
use crate::animator::{DEFAULT_FRAME_RATE, EyeAnimator};
use crate::emotion::FaceController;

struct PageState {
    canvas: HtmlCanvasElement,
    face: FaceController<CanvasSurface>,
}

impl PageState {
    /// Pointer position in client coordinates, relative to the canvas center.
    fn look_at_client(&mut self, client_x: f64, client_y: f64) {
        let rect = self.canvas.get_bounding_client_rect();
        let cx = rect.left() + rect.width() / 2.0;
        let cy = rect.top() + rect.height() / 2.0;
        self.face.look_toward(client_x - cx, client_y - cy);
    }
}

thread_local! {
    static PAGE_STATE: RefCell<Option<PageState>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Start the eyes on `canvas_id` with the page defaults: autoblink every
/// 2-5 s and curiosity on. Replaces any previously started page.
#[wasm_bindgen]
pub fn start_robot_eyes(canvas_id: &str) -> Result<(), JsValue> {
    let doc = document()?;
    let surface = CanvasSurface::from_document(&doc, canvas_id)?;
    let canvas = surface.canvas().clone();
    let (w, h) = surface.size();

    let mut eyes = EyeAnimator::new(surface);
    eyes.initialize(w, h, DEFAULT_FRAME_RATE)?;
    eyes.set_auto_blink(true, 2.0, 3.0);
    eyes.set_curious(true);
    let face = FaceController::new(eyes);

    let already_running = PAGE_STATE.with(|cell| {
        cell.borrow_mut().replace(PageState { canvas, face }).is_some()
    });
    info!(canvas_id, width = w, height = h, "robot eyes started");
    if already_running {
        return Ok(());
    }

    {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            PAGE_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    st.look_at_client(evt.client_x() as f64, evt.client_y() as f64);
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |evt: TouchEvent| {
            let Some(touch) = evt.touches().get(0) else {
                return;
            };
            PAGE_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    st.look_at_client(touch.client_x() as f64, touch.client_y() as f64);
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            PAGE_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    if st.face.handle_key(&evt.key(), now_ms()) {
                        evt.prevent_default();
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    Ok(())
}

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        PAGE_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                st.face.tick(ts);
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(callback: &FrameCallback) {
    if let (Some(w), Some(cb)) = (window(), callback.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

//! DOM subscriptions that release themselves when dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Event, EventTarget, Window};

/// An event listener that stays registered until the value is dropped.
pub struct EventListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new<E, F>(target: &EventTarget, kind: &'static str, handler: F) -> Result<Self, JsValue>
    where
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        Self::register(target, kind, None, handler)
    }

    /// Registered with `passive: false` so the handler may `prevent_default`
    /// (needed to keep touch gestures from scrolling or zooming the page).
    pub fn non_passive<E, F>(target: &EventTarget, kind: &'static str, handler: F) -> Result<Self, JsValue>
    where
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        Self::register(target, kind, Some(&options), handler)
    }

    fn register<E, F>(
        target: &EventTarget,
        kind: &'static str,
        options: Option<&AddEventListenerOptions>,
        mut handler: F,
    ) -> Result<Self, JsValue>
    where
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        let callback = Closure::wrap(Box::new(move |e: Event| handler(e.unchecked_into::<E>()))
            as Box<dyn FnMut(Event)>);
        match options {
            Some(options) => target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                options,
            )?,
            None => target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?,
        }
        Ok(Self { target: target.clone(), kind, callback })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            log::debug!("removing {} listener failed: {:?}", self.kind, e);
        }
    }
}

/// requestAnimationFrame loop; cancelled on drop.
pub struct AnimationLoop {
    window: Window,
    raf_id: Rc<Cell<Option<i32>>>,
    closure_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl AnimationLoop {
    pub fn start<F>(window: &Window, mut frame: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let raf_id = Rc::new(Cell::new(None));
        let closure_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        {
            let raf_id = raf_id.clone();
            let window_loop = window.clone();
            let closure_cell_loop = closure_cell.clone();
            *closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                frame();
                if let Some(cb) = closure_cell_loop.borrow().as_ref() {
                    if let Ok(id) = window_loop.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        raf_id.set(Some(id));
                    }
                }
            }) as Box<dyn FnMut()>));
        }
        if let Some(cb) = closure_cell.borrow().as_ref() {
            raf_id.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
        }
        Ok(Self { window: window.clone(), raf_id, closure_cell })
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        if let Some(id) = self.raf_id.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::debug!("cancel_animation_frame({}) failed: {:?}", id, e);
            }
        }
        // the closure holds a handle to its own cell
        self.closure_cell.borrow_mut().take();
    }
}

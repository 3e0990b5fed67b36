use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, anyhow};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent};
use yew::prelude::*;

use super::painter;
use crate::config::SceneConfig;
use crate::dom::{AnimationLoop, EventListener};
use crate::state::toggle::Activation;
use crate::state::{ClientPoint, PointerInput, Stage};
use crate::util::{now_secs, touch_points};

#[derive(Properties, PartialEq, Clone)]
pub struct SceneViewProps {
    pub config: Rc<SceneConfig>,
    pub on_message: Callback<String>,
}

#[function_component(SceneView)]
pub fn scene_view(props: &SceneViewProps) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        let config = props.config.clone();
        let on_message = props.on_message.clone();
        use_effect_with((), move |_| {
            let mounted = match mount(&canvas_ref, &config, on_message) {
                Ok(mounted) => Some(mounted),
                Err(e) => {
                    log::error!("scene setup failed: {:#}", e);
                    None
                }
            };
            // Cleanup: dropping releases every listener and the frame loop
            move || drop(mounted)
        });
    }

    html! {
        <canvas ref={canvas_ref} id="scene-canvas" style="display:block; width:100%; height:100%; touch-action:none;"></canvas>
    }
}

/// Subscriptions held for as long as the view is mounted.
struct Mounted {
    _listeners: Vec<EventListener>,
    _frames: AnimationLoop,
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

fn fit_canvas(canvas: &HtmlCanvasElement, stage: &mut Stage) {
    let w = canvas.client_width().max(0) as u32;
    let h = canvas.client_height().max(0) as u32;
    if canvas.width() != w || canvas.height() != h {
        canvas.set_width(w);
        canvas.set_height(h);
        log::debug!("canvas resized to {}x{}", w, h);
    }
    stage.camera.resize(w as f64, h as f64);
}

/// Logs a click/tap and hands the stage's message to the panel.
fn report(stage: &RefCell<Stage>, activation: Option<Activation>, on_message: &Callback<String>) {
    let Some(activation) = activation else { return };
    match activation {
        Activation::Miss => return,
        Activation::Inert(id) => log::info!("Clicked on: {}", id),
        Activation::Toggled { id, clicked, target_y } => {
            log::info!("Clicked on: {}", id);
            log::debug!("{} {} toward y={:.2}", id, if clicked { "raised" } else { "lowered" }, target_y);
        }
    }
    let message = stage.borrow().message().map(str::to_owned);
    if let Some(message) = message {
        on_message.emit(message);
    }
}

fn mount(canvas_ref: &NodeRef, config: &SceneConfig, on_message: Callback<String>) -> anyhow::Result<Mounted> {
    let window = web_sys::window().context("no global `window` exists")?;
    let canvas: HtmlCanvasElement = canvas_ref
        .cast::<HtmlCanvasElement>()
        .context("canvas_ref not attached to a canvas element")?;
    let ctx = canvas
        .get_context("2d")
        .map_err(js_err)?
        .context("2d context unavailable")?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| anyhow!("context is not a CanvasRenderingContext2d"))?;

    let stage = Rc::new(RefCell::new(Stage::new(config)));
    fit_canvas(&canvas, &mut stage.borrow_mut());

    let mut listeners = Vec::new();

    // Mouse position is tracked on the window so drags may leave the canvas
    let mousemove = {
        let stage = stage.clone();
        let canvas = canvas.clone();
        EventListener::new(&window, "mousemove", move |e: MouseEvent| {
            let (x, y) = (e.client_x() as f64, e.client_y() as f64);
            let surface: &Element = &canvas;
            let mut st = stage.borrow_mut();
            st.pointer_input(&PointerInput::MouseMove(ClientPoint { x, y }), surface);
            if st.camera.is_dragging() {
                st.camera.drag_to(x, y, canvas.client_height() as f64);
            }
        })
    };
    listeners.push(mousemove.map_err(js_err).context("mousemove")?);

    let mousedown = {
        let stage = stage.clone();
        EventListener::new(&canvas, "mousedown", move |e: MouseEvent| {
            if e.button() == 0 {
                stage.borrow_mut().camera.begin_drag(e.client_x() as f64, e.client_y() as f64);
            }
        })
    };
    listeners.push(mousedown.map_err(js_err).context("mousedown")?);

    let mouseup = {
        let stage = stage.clone();
        EventListener::new(&window, "mouseup", move |_e: MouseEvent| {
            stage.borrow_mut().camera.end_drag();
        })
    };
    listeners.push(mouseup.map_err(js_err).context("mouseup")?);

    let click = {
        let stage = stage.clone();
        let on_message = on_message.clone();
        EventListener::new(&canvas, "click", move |_e: MouseEvent| {
            let activation = stage.borrow_mut().click(now_secs());
            report(&stage, activation, &on_message);
        })
    };
    listeners.push(click.map_err(js_err).context("click")?);

    let wheel = {
        let stage = stage.clone();
        EventListener::non_passive(&canvas, "wheel", move |e: WheelEvent| {
            e.prevent_default();
            stage.borrow_mut().camera.zoom_by(e.delta_y());
        })
    };
    listeners.push(wheel.map_err(js_err).context("wheel")?);

    // Touch: one finger orbits, a tap activates on release
    let touchstart = {
        let stage = stage.clone();
        let canvas_el = canvas.clone();
        EventListener::non_passive(&canvas, "touchstart", move |e: TouchEvent| {
            e.prevent_default();
            let touches = touch_points(&e.touches());
            if touches.is_empty() {
                return;
            }
            let surface: &Element = &canvas_el;
            stage
                .borrow_mut()
                .touch_input(&PointerInput::TouchStart(touches), surface, now_secs());
        })
    };
    listeners.push(touchstart.map_err(js_err).context("touchstart")?);

    let touchmove = {
        let stage = stage.clone();
        let canvas_el = canvas.clone();
        EventListener::non_passive(&canvas, "touchmove", move |e: TouchEvent| {
            e.prevent_default();
            let surface: &Element = &canvas_el;
            stage.borrow_mut().touch_input(
                &PointerInput::TouchMove(touch_points(&e.touches())),
                surface,
                now_secs(),
            );
        })
    };
    listeners.push(touchmove.map_err(js_err).context("touchmove")?);

    let touchend = {
        let stage = stage.clone();
        let canvas_el = canvas.clone();
        let on_message = on_message.clone();
        EventListener::new(&canvas, "touchend", move |e: TouchEvent| {
            let surface: &Element = &canvas_el;
            let remaining = e.touches().length();
            let activation = stage
                .borrow_mut()
                .touch_input(&PointerInput::TouchEnd { remaining }, surface, now_secs());
            report(&stage, activation, &on_message);
        })
    };
    listeners.push(touchend.map_err(js_err).context("touchend")?);

    let touchcancel = {
        let stage = stage.clone();
        let canvas_el = canvas.clone();
        EventListener::new(&canvas, "touchcancel", move |e: TouchEvent| {
            let surface: &Element = &canvas_el;
            stage.borrow_mut().touch_cancel(e.touches().length(), surface);
        })
    };
    listeners.push(touchcancel.map_err(js_err).context("touchcancel")?);

    let resize = {
        let stage = stage.clone();
        let canvas = canvas.clone();
        EventListener::new(&window, "resize", move |_e: web_sys::Event| {
            fit_canvas(&canvas, &mut stage.borrow_mut());
        })
    };
    listeners.push(resize.map_err(js_err).context("resize")?);

    let frames = {
        let canvas = canvas.clone();
        let mut hovering = false;
        AnimationLoop::start(&window, move || {
            if !canvas.is_connected() {
                return;
            }
            let mut st = stage.borrow_mut();
            st.frame(now_secs());
            painter::paint(&ctx, &st, canvas.width() as f64, canvas.height() as f64);
            let hover = st.hovered().is_some();
            if hover != hovering {
                hovering = hover;
                let cursor = if hover { "pointer" } else { "default" };
                if let Err(e) = canvas.style().set_property("cursor", cursor) {
                    log::debug!("cursor update failed: {:?}", e);
                }
            }
        })
        .map_err(js_err)
        .context("requestAnimationFrame")?
    };

    Ok(Mounted { _listeners: listeners, _frames: frames })
}

use crate::config::SceneConfig;
use crate::model::{Color, ObjectId, Scene, SceneGraph};

use super::camera::OrbitCamera;
use super::hit::{self, RayCaster};
use super::pointer::{PointerInput, PointerTracker, RenderSurface};
use super::toggle::{Activation, ToggleController};

/// Everything one mounted scene needs between input events and frames.
#[derive(Debug, Clone)]
pub struct Stage {
    pub scene: Scene,
    pub camera: OrbitCamera,
    pub sky: Color,
    pointer: PointerTracker,
    toggles: ToggleController,
    hovered: Option<ObjectId>,
    message: Option<String>,
}

impl Stage {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            scene: Scene::from_config(config),
            camera: OrbitCamera::from_config(&config.camera),
            sky: config.sky,
            pointer: PointerTracker::default(),
            toggles: ToggleController::from_config(config),
            hovered: None,
            message: None,
        }
    }

    pub fn pointer_input(&mut self, input: &PointerInput, surface: &impl RenderSurface) {
        self.pointer.on_raw_event(input, surface);
    }

    /// Text for the message panel: the last object hit, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Toggleable object under the pointer as of the last frame.
    pub fn hovered(&self) -> Option<ObjectId> {
        self.hovered
    }

    /// Per-frame update: recast from the current pointer to refresh the
    /// hover target, then advance animations.
    pub fn frame(&mut self, now: f64) {
        let ray = self.camera.ray_through(self.pointer.current());
        self.hovered = hit::nearest(self.scene.intersect(&ray))
            .map(|h| h.object)
            .filter(|id| self.toggles.state(*id).is_some());
        if self.toggles.is_animating() {
            self.toggles.tick(now, &mut self.scene);
        }
    }

    /// Mouse click. Dropped when it trails an orbit drag.
    pub fn click(&mut self, now: f64) -> Option<Activation> {
        if self.camera.take_suppressed_click() {
            return None;
        }
        Some(self.activate(now))
    }

    /// Touch gestures. One finger orbits the camera; lifting the last finger
    /// within the click slop activates at the last touch point.
    pub fn touch_input(&mut self, input: &PointerInput, surface: &impl RenderSurface, now: f64) -> Option<Activation> {
        self.pointer.on_raw_event(input, surface);
        match input {
            PointerInput::TouchStart(touches) => {
                match touches.first() {
                    Some(first) if !self.camera.is_dragging() => self.camera.begin_drag(first.x, first.y),
                    _ => {}
                }
                None
            }
            PointerInput::TouchMove(touches) => {
                match touches.first() {
                    Some(first) if self.pointer.touch_active() => {
                        self.camera.drag_to(first.x, first.y, surface.bounds().height)
                    }
                    _ => {}
                }
                None
            }
            PointerInput::TouchEnd { .. } => {
                if self.pointer.touch_active() || !self.camera.is_dragging() {
                    return None;
                }
                self.camera.end_drag();
                self.click(now)
            }
            PointerInput::MouseMove(_) => None,
        }
    }

    /// The browser took the gesture over; ends any touch drag without activating.
    pub fn touch_cancel(&mut self, remaining: u32, surface: &impl RenderSurface) {
        self.pointer.on_raw_event(&PointerInput::TouchEnd { remaining }, surface);
        if !self.pointer.touch_active() {
            self.camera.end_drag();
            self.camera.take_suppressed_click();
        }
    }

    /// Resolves against the pointer as it is right now, not the ray cast on
    /// the last frame. A miss leaves the message as it was.
    pub fn activate(&mut self, now: f64) -> Activation {
        let hit = hit::resolve(self.pointer.current(), &self.camera, &self.scene);
        if let Some(h) = &hit {
            log::debug!("hit {} at {:.2?} ({:.2} away)", h.object, h.point, h.distance);
        }
        let activation = self.toggles.on_activate(hit.as_ref(), &mut self.scene, now);
        if let Some(message) = activation.message() {
            self.message = Some(message);
        }
        activation
    }
}

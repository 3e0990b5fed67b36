// Per-sphere toggle state and the animated height/color transitions it drives.
use std::collections::HashMap;

use crate::config::SceneConfig;
use crate::model::{Color, Intersection, NodeId, ObjectId, SceneGraph};

use super::tween::{Ease, Tween};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToggleState {
    pub clicked: bool,
    pub rest_color: Color,
    pub active_color: Color,
}

impl ToggleState {
    pub fn new(rest_color: Color, active_color: Color) -> Self {
        Self { clicked: false, rest_color, active_color }
    }

    /// The color the object must be displayed with in its current state.
    pub fn color(&self) -> Color {
        if self.clicked { self.active_color } else { self.rest_color }
    }
}

/// One entry per toggleable object.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleTable {
    red: ToggleState,
    green: ToggleState,
    blue: ToggleState,
}

impl ToggleTable {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            red: ToggleState::new(config.red.rest_color, config.red.active_color),
            green: ToggleState::new(config.green.rest_color, config.green.active_color),
            blue: ToggleState::new(config.blue.rest_color, config.blue.active_color),
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&ToggleState> {
        match id {
            ObjectId::Floor => None,
            ObjectId::Red => Some(&self.red),
            ObjectId::Green => Some(&self.green),
            ObjectId::Blue => Some(&self.blue),
        }
    }

    fn get_mut(&mut self, id: ObjectId) -> Option<&mut ToggleState> {
        match id {
            ObjectId::Floor => None,
            ObjectId::Red => Some(&mut self.red),
            ObjectId::Green => Some(&mut self.green),
            ObjectId::Blue => Some(&mut self.blue),
        }
    }
}

/// Outcome of a single activation (click or tap).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Miss,
    /// Hit an object that has no toggle state (the floor).
    Inert(ObjectId),
    Toggled { id: ObjectId, clicked: bool, target_y: f32 },
}

impl Activation {
    pub fn object(&self) -> Option<ObjectId> {
        match *self {
            Activation::Miss => None,
            Activation::Inert(id) | Activation::Toggled { id, .. } => Some(id),
        }
    }

    /// Text for the message panel; `None` means leave it as it is.
    pub fn message(&self) -> Option<String> {
        self.object().map(|id| format!("You clicked on: {}", id))
    }
}

#[derive(Debug, Clone)]
pub struct ToggleController {
    table: ToggleTable,
    rest_height: f32,
    raise: f32,
    duration: f64,
    ease: Ease,
    tweens: HashMap<NodeId, Tween>,
}

impl ToggleController {
    pub fn from_config(config: &SceneConfig) -> Self {
        let t = &config.toggle;
        Self {
            table: ToggleTable::from_config(config),
            rest_height: t.rest_height,
            raise: t.raise.max(0.0),
            duration: t.duration_secs.max(0.0),
            ease: t.ease,
            tweens: HashMap::new(),
        }
    }

    pub fn state(&self, id: ObjectId) -> Option<&ToggleState> {
        self.table.get(id)
    }

    /// Closed range every toggleable object's height is held to.
    pub fn height_range(&self) -> (f32, f32) {
        (self.rest_height, self.rest_height + self.raise)
    }

    /// In-flight animation target for `node`, if one is running.
    #[cfg(test)]
    pub fn target(&self, node: NodeId) -> Option<f32> {
        self.tweens.get(&node).map(Tween::target)
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    fn target_height(&self, clicked: bool) -> f32 {
        let (lo, hi) = self.height_range();
        let lift = if clicked { self.raise } else { 0.0 };
        (self.rest_height + lift).clamp(lo, hi)
    }

    pub fn on_activate<G>(&mut self, hit: Option<&Intersection>, scene: &mut G, now: f64) -> Activation
    where
        G: SceneGraph + ?Sized,
    {
        let Some(hit) = hit else {
            return Activation::Miss;
        };
        let Some(state) = self.table.get_mut(hit.object) else {
            return Activation::Inert(hit.object);
        };
        state.clicked = !state.clicked;
        let clicked = state.clicked;
        scene.set_color(hit.node, state.color());

        let target_y = self.target_height(clicked);
        let current = scene.position_y(hit.node).unwrap_or(self.rest_height);
        // replaces any in-flight tween for this node
        self.tweens.insert(hit.node, Tween::new(current, target_y, now, self.duration, self.ease));

        Activation::Toggled { id: hit.object, clicked, target_y }
    }

    /// Advances every running transition to `now`.
    pub fn tick<G>(&mut self, now: f64, scene: &mut G)
    where
        G: SceneGraph + ?Sized,
    {
        let (lo, hi) = self.height_range();
        self.tweens.retain(|node, tween| {
            scene.set_position_y(*node, tween.sample(now).clamp(lo, hi));
            !tween.is_finished(now)
        });
    }
}

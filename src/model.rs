//! Scene graph for the sphere scene.
//! The interaction core only talks to it through [`SceneGraph`].

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::math::{self, Ray};

/// Identity of every named object in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectId {
    Floor,
    Red,
    Green,
    Blue,
}

impl ObjectId {
    pub fn name(self) -> &'static str {
        match self {
            ObjectId::Floor => "Floor",
            ObjectId::Red => "Red ball",
            ObjectId::Green => "Green ball",
            ObjectId::Blue => "Blue ball",
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Mix towards `other`; `t = 0` keeps `self`.
    pub fn mix(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::rgb(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color `{}`, expected #rrggbb", value))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_css()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    /// Horizontal quad in the node's xz plane.
    Plane { half_width: f32, half_depth: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh { id: ObjectId, shape: Shape, color: Color },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub kind: NodeKind,
    /// Translation relative to the parent.
    pub position: Vec3,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn group(position: Vec3) -> Self {
        Self { kind: NodeKind::Group, position, children: Vec::new() }
    }

    pub fn mesh(id: ObjectId, shape: Shape, color: Color, position: Vec3) -> Self {
        Self { kind: NodeKind::Mesh { id, shape, color }, position, children: Vec::new() }
    }
}

/// One ray hit against a mesh node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub node: NodeId,
    pub object: ObjectId,
    pub distance: f32,
    pub point: Vec3,
}

/// Capabilities the interaction core needs from whoever owns the scene.
pub trait SceneGraph {
    /// Every hit among all descendants of the root, nearest first.
    fn intersect(&self, ray: &Ray) -> Vec<Intersection>;
    fn position_y(&self, node: NodeId) -> Option<f32>;
    fn set_position_y(&mut self, node: NodeId, y: f32);
    fn set_color(&mut self, node: NodeId, color: Color);
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene holding only the root group.
    pub fn new() -> Self {
        Self { nodes: vec![SceneNode::group(Vec3::ZERO)] }
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        let mut scene = Scene::new();
        let root = scene.root();
        let floor = &config.floor;
        scene.add_child(
            root,
            SceneNode::mesh(
                ObjectId::Floor,
                Shape::Plane { half_width: floor.size * 0.5, half_depth: floor.size * 0.5 },
                floor.color,
                Vec3::ZERO,
            ),
        );
        let rest = config.toggle.rest_height;
        for (id, ball) in [
            (ObjectId::Blue, &config.blue),
            (ObjectId::Green, &config.green),
            (ObjectId::Red, &config.red),
        ] {
            scene.add_child(
                root,
                SceneNode::mesh(
                    id,
                    Shape::Sphere { radius: ball.radius },
                    ball.rest_color,
                    Vec3::new(ball.x, rest, ball.z),
                ),
            );
        }
        scene
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.children.clear();
        self.nodes.push(node);
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// Depth-first pre-order listing of every node with its world position.
    pub fn walk(&self) -> Vec<(NodeId, Vec3)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root(), Vec3::ZERO)];
        while let Some((id, offset)) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            let world = offset + node.position;
            out.push((id, world));
            for child in node.children.iter().rev() {
                stack.push((*child, world));
            }
        }
        out
    }
}

impl SceneGraph for Scene {
    fn intersect(&self, ray: &Ray) -> Vec<Intersection> {
        let mut hits = Vec::new();
        for (id, world) in self.walk() {
            let NodeKind::Mesh { id: object, shape, .. } = self.nodes[id.0].kind else {
                continue;
            };
            let t = match shape {
                Shape::Sphere { radius } => math::intersect_sphere(ray, world, radius),
                Shape::Plane { half_width, half_depth } => {
                    math::intersect_plane(ray, world, half_width, half_depth)
                }
            };
            if let Some(distance) = t {
                hits.push(Intersection { node: id, object, distance, point: ray.at(distance) });
            }
        }
        // stable: equal distances keep traversal order
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn position_y(&self, node: NodeId) -> Option<f32> {
        self.node(node).map(|n| n.position.y)
    }

    fn set_position_y(&mut self, node: NodeId, y: f32) {
        if let Some(n) = self.node_mut(node) {
            n.position.y = y;
        }
    }

    fn set_color(&mut self, node: NodeId, new_color: Color) {
        if let Some(SceneNode { kind: NodeKind::Mesh { color, .. }, .. }) = self.node_mut(node) {
            *color = new_color;
        }
    }
}

// Lookups used by the tests to aim at objects by identity.
#[cfg(test)]
impl Scene {
    /// First node (in traversal order) carrying `object`.
    pub fn find(&self, object: ObjectId) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|(id, _)| matches!(self.nodes[id.0].kind, NodeKind::Mesh { id: o, .. } if o == object))
            .map(|(id, _)| id)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.walk().into_iter().find(|(n, _)| *n == id).map(|(_, world)| world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
    }

    const ALL: [ObjectId; 4] = [ObjectId::Floor, ObjectId::Red, ObjectId::Green, ObjectId::Blue];

    #[test]
    fn test_object_display_names() {
        let names: Vec<String> = ALL.iter().map(|id| id.to_string()).collect();
        assert_eq!(names, ["Floor", "Red ball", "Green ball", "Blue ball"]);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_hex("#C15151"), Some(Color::rgb(0xc1, 0x51, 0x51)));
        assert_eq!(Color::from_hex("98f5f9"), Some(Color::rgb(0x98, 0xf5, 0xf9)));
        assert_eq!(Color::from_hex("#fffff"), None);
        assert_eq!(Color::rgb(0x1b, 0x4f, 0x3a).to_css(), "#1b4f3a");
    }

    #[test]
    fn test_default_scene_has_every_object() {
        let scene = Scene::from_config(&SceneConfig::default());
        for id in ALL {
            assert!(scene.find(id).is_some(), "missing {}", id);
        }
    }

    #[test]
    fn test_ray_down_hits_ball_before_floor() {
        let scene = Scene::from_config(&SceneConfig::default());
        let hits = scene.intersect(&down_ray(2.0, 0.0));
        let objects: Vec<_> = hits.iter().map(|h| h.object).collect();
        assert_eq!(objects, vec![ObjectId::Green, ObjectId::Floor]);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn test_nested_nodes_are_intersected_in_world_space() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.add_child(root, SceneNode::group(Vec3::new(5.0, 0.0, 0.0)));
        let inner = scene.add_child(group, SceneNode::group(Vec3::new(0.0, 1.0, 0.0)));
        let ball = scene.add_child(
            inner,
            SceneNode::mesh(ObjectId::Red, Shape::Sphere { radius: 0.5 }, Color::rgb(255, 0, 0), Vec3::ZERO),
        );
        assert_eq!(scene.world_position(ball), Some(Vec3::new(5.0, 1.0, 0.0)));

        let hits = scene.intersect(&down_ray(5.0, 0.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, ball);
        assert!((hits[0].point.y - 1.5).abs() < 1e-4);
        assert!(scene.intersect(&down_ray(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_mutation_through_scene_graph() {
        let mut scene = Scene::from_config(&SceneConfig::default());
        let red = scene.find(ObjectId::Red).unwrap();
        scene.set_position_y(red, 1.25);
        scene.set_color(red, Color::rgb(1, 2, 3));
        assert_eq!(scene.position_y(red), Some(1.25));
        match &scene.node(red).unwrap().kind {
            NodeKind::Mesh { color, .. } => assert_eq!(*color, Color::rgb(1, 2, 3)),
            NodeKind::Group => panic!("expected mesh"),
        }
    }
}

// Hit resolution: pointer -> ray -> nearest intersection.

use crate::math::Ray;
use crate::model::{Intersection, SceneGraph};

use super::pointer::PointerState;

/// Anything that can turn a normalized pointer into a world-space ray.
pub trait RayCaster {
    fn ray_through(&self, pointer: PointerState) -> Ray;
}

/// Casts a fresh ray through `pointer` and returns the nearest hit.
pub fn resolve<C, G>(pointer: PointerState, camera: &C, scene: &G) -> Option<Intersection>
where
    C: RayCaster + ?Sized,
    G: SceneGraph + ?Sized,
{
    let ray = camera.ray_through(pointer);
    nearest(scene.intersect(&ray))
}

/// Smallest distance wins; exact ties keep the earlier entry.
pub fn nearest(hits: Vec<Intersection>) -> Option<Intersection> {
    hits.into_iter().min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, NodeId, ObjectId, Scene, SceneNode, Shape};
    use glam::Vec3;

    /// Camera stand-in: every pointer maps to the same fixed ray.
    struct FixedRay(Ray);

    impl RayCaster for FixedRay {
        fn ray_through(&self, _pointer: PointerState) -> Ray {
            self.0
        }
    }

    /// Scene stand-in returning canned, deliberately unsorted hits.
    struct Canned(Vec<Intersection>);

    impl SceneGraph for Canned {
        fn intersect(&self, _ray: &Ray) -> Vec<Intersection> {
            self.0.clone()
        }
        fn position_y(&self, _node: NodeId) -> Option<f32> {
            None
        }
        fn set_position_y(&mut self, _node: NodeId, _y: f32) {}
        fn set_color(&mut self, _node: NodeId, _color: Color) {}
    }

    fn hit(scene: &mut Scene, object: ObjectId, distance: f32) -> Intersection {
        let root = scene.root();
        let node = scene.add_child(
            root,
            SceneNode::mesh(object, Shape::Sphere { radius: 1.0 }, Color::rgb(0, 0, 0), Vec3::ZERO),
        );
        Intersection { node, object, distance, point: Vec3::ZERO }
    }

    fn forward() -> FixedRay {
        FixedRay(Ray::new(Vec3::ZERO, Vec3::NEG_Z))
    }

    #[test]
    fn test_picks_nearest_regardless_of_order() {
        let mut scene = Scene::new();
        let far = hit(&mut scene, ObjectId::Red, 5.0);
        let near = hit(&mut scene, ObjectId::Blue, 2.0);
        let picked = resolve(PointerState::default(), &forward(), &Canned(vec![far, near])).unwrap();
        assert_eq!(picked.object, ObjectId::Blue);
        assert_eq!(picked.distance, 2.0);
    }

    #[test]
    fn test_tie_goes_to_first_in_traversal_order() {
        let mut scene = Scene::new();
        let a = hit(&mut scene, ObjectId::Green, 3.0);
        let b = hit(&mut scene, ObjectId::Red, 3.0);
        assert_eq!(nearest(vec![a, b]).unwrap().node, a.node);
    }

    #[test]
    fn test_miss_returns_none() {
        assert!(resolve(PointerState::default(), &forward(), &Canned(vec![])).is_none());
    }

    #[test]
    fn test_overlapping_spheres_in_real_scene() {
        let mut scene = Scene::new();
        let root = scene.root();
        let color = Color::rgb(9, 9, 9);
        scene.add_child(
            root,
            SceneNode::mesh(ObjectId::Red, Shape::Sphere { radius: 1.0 }, color, Vec3::new(0.0, 0.0, -6.0)),
        );
        let group = scene.add_child(root, SceneNode::group(Vec3::new(0.0, 0.0, -3.0)));
        scene.add_child(
            group,
            SceneNode::mesh(ObjectId::Green, Shape::Sphere { radius: 1.0 }, color, Vec3::ZERO),
        );
        let picked = resolve(PointerState::default(), &forward(), &scene).unwrap();
        assert_eq!(picked.object, ObjectId::Green);
        assert!((picked.distance - 2.0).abs() < 1e-4);
    }
}

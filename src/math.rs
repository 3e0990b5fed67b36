//! Ray geometry used for picking.

use glam::Vec3;

const EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Distance along `ray` to the nearest surface point of the sphere, if any.
/// A ray starting inside the sphere reports the exit point.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.dir.dot(ray.dir);
    if a == 0.0 {
        return None;
    }
    let half_b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t = (-half_b - sqrt_d) / a;
    if t > EPSILON {
        return Some(t);
    }
    let t = (-half_b + sqrt_d) / a;
    (t > EPSILON).then_some(t)
}

/// Intersection with a horizontal, finite plane centred on `center`
/// spanning `half_width` along x and `half_depth` along z.
pub fn intersect_plane(ray: &Ray, center: Vec3, half_width: f32, half_depth: f32) -> Option<f32> {
    if ray.dir.y.abs() < 1e-8 {
        return None;
    }
    let t = (center.y - ray.origin.y) / ray.dir.y;
    if t <= EPSILON {
        return None;
    }
    let p = ray.at(t);
    let inside = (p.x - center.x).abs() <= half_width && (p.z - center.z).abs() <= half_depth;
    inside.then_some(t)
}

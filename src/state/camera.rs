// Orbiting perspective camera: ray casting for picking, projection for painting.
use std::f32::consts::TAU;

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::math::Ray;

use super::hit::RayCaster;
use super::pointer::PointerState;

/// Drags shorter than this (client px) still count as clicks.
pub const CLICK_SLOP_PX: f64 = 4.0;

/// Wheel delta (px) per e-fold of orbit distance.
const WHEEL_PX_PER_EFOLD: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    /// Distance in front of the camera along its view axis.
    pub depth: f32,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    last_x: f64,
    last_y: f64,
    travelled: f64,
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    radius: f32,
    azimuth: f32,
    polar: f32,
    min_polar: f32,
    max_polar: f32,
    min_radius: f32,
    max_radius: f32,
    fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    drag: Option<Drag>,
    suppress_click: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let target = Vec3::from_array(config.target);
        let offset = Vec3::from_array(config.position) - target;
        let min_radius = config.min_distance.max(1e-3);
        let max_radius = config.max_distance.max(min_radius);
        let dist = offset.length().max(1e-3);
        let radius = dist.clamp(min_radius, max_radius);
        let min_polar = config.min_polar_deg.to_radians();
        let max_polar = config.max_polar_deg.to_radians();
        let polar = (offset.y / dist).clamp(-1.0, 1.0).acos();
        Self {
            target,
            radius,
            azimuth: offset.x.atan2(offset.z),
            polar: polar.clamp(min_polar, max_polar),
            min_polar,
            max_polar,
            min_radius,
            max_radius,
            fov_y: config.fov_deg.to_radians(),
            aspect: 1.0,
            near: config.near,
            far: config.far,
            drag: None,
            suppress_click: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + self.radius * Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.aspect = (width / height) as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn to_view(&self, world: Vec3) -> Vec3 {
        self.view().transform_point3(world)
    }

    /// Projects a view-space point lying in front of the near plane.
    pub fn view_to_screen(&self, view: Vec3, width: f64, height: f64) -> ScreenPoint {
        let ndc = self.projection().project_point3(view);
        ScreenPoint {
            x: (ndc.x as f64 + 1.0) * 0.5 * width,
            y: (1.0 - ndc.y as f64) * 0.5 * height,
            depth: -view.z,
        }
    }

    pub fn to_screen(&self, world: Vec3, width: f64, height: f64) -> Option<ScreenPoint> {
        let view = self.to_view(world);
        (-view.z > self.near).then(|| self.view_to_screen(view, width, height))
    }

    /// On-screen radius in pixels of a sphere at `depth`.
    pub fn screen_radius(&self, radius: f32, depth: f32, height: f64) -> f64 {
        let half = (self.fov_y * 0.5).tan() * depth.max(self.near);
        (radius / half) as f64 * height * 0.5
    }

    /// Dollies toward (negative delta) or away from the target, clamped to
    /// the configured distance range.
    pub fn zoom_by(&mut self, delta_y: f64) {
        if !delta_y.is_finite() {
            return;
        }
        let factor = (delta_y / WHEEL_PX_PER_EFOLD).exp() as f32;
        self.radius = (self.radius * factor).clamp(self.min_radius, self.max_radius);
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.drag = Some(Drag { last_x: x, last_y: y, travelled: 0.0 });
        self.suppress_click = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Orbits by a full turn per surface height of travel.
    pub fn drag_to(&mut self, x: f64, y: f64, surface_height: f64) {
        let Some(drag) = self.drag.as_mut() else { return };
        if surface_height <= 0.0 {
            return;
        }
        let dx = x - drag.last_x;
        let dy = y - drag.last_y;
        drag.last_x = x;
        drag.last_y = y;
        drag.travelled += dx.hypot(dy);
        self.azimuth -= TAU * (dx / surface_height) as f32;
        self.polar = (self.polar - TAU * (dy / surface_height) as f32).clamp(self.min_polar, self.max_polar);
    }

    pub fn end_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.suppress_click = drag.travelled > CLICK_SLOP_PX;
        }
    }

    /// True once after a drag long enough that its trailing click should be dropped.
    pub fn take_suppressed_click(&mut self) -> bool {
        std::mem::take(&mut self.suppress_click)
    }
}

impl RayCaster for OrbitCamera {
    fn ray_through(&self, pointer: PointerState) -> Ray {
        let inv = (self.projection() * self.view()).inverse();
        let (x, y) = (pointer.x as f32, pointer.y as f32);
        let far = inv.project_point3(Vec3::new(x, y, 1.0));
        let eye = self.position();
        Ray::new(eye, far - eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::pointer::SurfaceRect;

    fn distance_to_ray(ray: &Ray, p: Vec3) -> f32 {
        let v = p - ray.origin;
        (v - ray.dir * v.dot(ray.dir)).length()
    }

    #[test]
    fn test_initial_position_matches_config() {
        let cam = OrbitCamera::default();
        assert!((cam.position() - Vec3::new(0.0, 1.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn test_center_pointer_looks_at_target() {
        let cam = OrbitCamera::default();
        let ray = cam.ray_through(PointerState::default());
        assert!(distance_to_ray(&ray, cam.target) < 1e-3);
    }

    #[test]
    fn test_upper_pointer_casts_upwards() {
        let cam = OrbitCamera::default();
        let center = cam.ray_through(PointerState::default());
        let top = cam.ray_through(PointerState { x: 0.0, y: 1.0 });
        assert!(top.dir.y > center.dir.y);
    }

    #[test]
    fn test_projection_and_ray_agree() {
        let mut cam = OrbitCamera::default();
        cam.resize(800.0, 600.0);
        let world = Vec3::new(2.0, 0.5, 0.0);
        let s = cam.to_screen(world, 800.0, 600.0).unwrap();
        let pointer = SurfaceRect::new(0.0, 0.0, 800.0, 600.0).normalize(s.x, s.y).unwrap();
        let ray = cam.ray_through(pointer);
        assert!(distance_to_ray(&ray, world) < 1e-3);
    }

    #[test]
    fn test_points_behind_camera_do_not_project() {
        let cam = OrbitCamera::default();
        assert!(cam.to_screen(Vec3::new(0.0, 1.0, 10.0), 800.0, 600.0).is_none());
    }

    #[test]
    fn test_drag_clamps_polar_angle() {
        let mut cam = OrbitCamera::default();
        cam.begin_drag(0.0, 0.0);
        cam.drag_to(0.0, -10_000.0, 600.0);
        assert!((cam.polar - 80f32.to_radians()).abs() < 1e-5);
        cam.drag_to(0.0, 10_000.0, 600.0);
        assert!((cam.polar - 60f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn test_wheel_zoom_is_clamped() {
        let mut cam = OrbitCamera::default();
        let start = cam.radius;
        cam.zoom_by(-100.0);
        assert!(cam.radius < start);
        cam.zoom_by(1e6);
        assert_eq!(cam.radius, 20.0);
        cam.zoom_by(-1e6);
        assert_eq!(cam.radius, 2.0);
        cam.zoom_by(f64::NAN);
        assert_eq!(cam.radius, 2.0);
        assert!(((cam.position() - cam.target).length() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_keeps_target_centered() {
        let mut cam = OrbitCamera::default();
        cam.zoom_by(300.0);
        let ray = cam.ray_through(PointerState::default());
        assert!(distance_to_ray(&ray, cam.target) < 1e-3);
    }

    #[test]
    fn test_short_drag_keeps_click() {
        let mut cam = OrbitCamera::default();
        cam.begin_drag(10.0, 10.0);
        cam.drag_to(11.0, 11.0, 600.0);
        cam.end_drag();
        assert!(!cam.take_suppressed_click());

        cam.begin_drag(10.0, 10.0);
        cam.drag_to(60.0, 10.0, 600.0);
        cam.end_drag();
        assert!(cam.take_suppressed_click());
        assert!(!cam.take_suppressed_click());
    }
}

// Canvas 2D painter for the sphere scene: sky, floor, shadows, spheres.
use glam::Vec3;
use web_sys::CanvasRenderingContext2d;

use crate::model::{Color, NodeKind, Shape};
use crate::state::camera::ScreenPoint;
use crate::state::{OrbitCamera, Stage};

const WHITE: Color = Color::rgb(255, 255, 255);
const BLACK: Color = Color::rgb(0, 0, 0);

struct Disc {
    at: ScreenPoint,
    radius_px: f64,
    color: Color,
}

pub fn paint(ctx: &CanvasRenderingContext2d, stage: &Stage, w: f64, h: f64) {
    let cam = &stage.camera;
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    ctx.set_fill_style_str(&stage.sky.to_css());
    ctx.fill_rect(0.0, 0.0, w, h);

    let mut discs = Vec::new();
    let mut shadows = Vec::new();
    let mut ground: Option<f32> = None;
    for (id, world) in stage.scene.walk() {
        let Some(node) = stage.scene.node(id) else { continue };
        let NodeKind::Mesh { shape, color, .. } = node.kind else { continue };
        match shape {
            Shape::Plane { half_width, half_depth } => {
                paint_plane(ctx, cam, world, half_width, half_depth, color, w, h);
                ground = Some(ground.map_or(world.y, |g| g.min(world.y)));
            }
            Shape::Sphere { radius } => {
                if let Some(at) = cam.to_screen(world, w, h) {
                    let radius_px = cam.screen_radius(radius, at.depth, h);
                    discs.push(Disc { at, radius_px, color });
                }
                shadows.push((world, radius));
            }
        }
    }

    if let Some(ground_y) = ground {
        ctx.set_fill_style_str("rgba(0,0,0,0.28)");
        for (center, radius) in shadows {
            let foot = Vec3::new(center.x, ground_y, center.z);
            let Some(at) = cam.to_screen(foot, w, h) else { continue };
            // shrinks as the sphere rises
            let lift = (center.y - ground_y - radius).max(0.0);
            let r = cam.screen_radius(radius, at.depth, h) / (1.0 + lift as f64);
            ctx.begin_path();
            if ctx.ellipse(at.x, at.y, r, r * 0.3, 0.0, 0.0, std::f64::consts::TAU).is_ok() {
                ctx.fill();
            }
        }
    }

    discs.sort_by(|a, b| b.at.depth.total_cmp(&a.at.depth));
    for disc in &discs {
        paint_sphere(ctx, disc);
    }
}

#[allow(clippy::too_many_arguments)]
fn paint_plane(
    ctx: &CanvasRenderingContext2d,
    cam: &OrbitCamera,
    center: Vec3,
    half_width: f32,
    half_depth: f32,
    color: Color,
    w: f64,
    h: f64,
) {
    let corners = [
        Vec3::new(-half_width, 0.0, -half_depth),
        Vec3::new(half_width, 0.0, -half_depth),
        Vec3::new(half_width, 0.0, half_depth),
        Vec3::new(-half_width, 0.0, half_depth),
    ]
    .map(|c| cam.to_view(center + c));
    let clipped = clip_near(&corners, cam.near * 1.01);
    if clipped.len() < 3 {
        return;
    }
    ctx.begin_path();
    for (i, v) in clipped.iter().enumerate() {
        let p = cam.view_to_screen(*v, w, h);
        if i == 0 {
            ctx.move_to(p.x, p.y);
        } else {
            ctx.line_to(p.x, p.y);
        }
    }
    ctx.close_path();
    ctx.set_fill_style_str(&color.to_css());
    ctx.fill();
}

fn paint_sphere(ctx: &CanvasRenderingContext2d, disc: &Disc) {
    let Disc { at, radius_px: r, color } = disc;
    if *r <= 0.0 {
        return;
    }
    let lit = ctx
        .create_radial_gradient(at.x - r * 0.35, at.y - r * 0.35, r * 0.1, at.x, at.y, *r)
        .ok()
        .filter(|g| {
            g.add_color_stop(0.0, &color.mix(WHITE, 0.45).to_css()).is_ok()
                && g.add_color_stop(1.0, &color.mix(BLACK, 0.35).to_css()).is_ok()
        });
    match lit {
        Some(gradient) => ctx.set_fill_style_canvas_gradient(&gradient),
        None => ctx.set_fill_style_str(&color.to_css()),
    }
    ctx.begin_path();
    if ctx.arc(at.x, at.y, *r, 0.0, std::f64::consts::TAU).is_ok() {
        ctx.fill();
    }
}

/// Clips a view-space polygon to the part in front of the near plane.
fn clip_near(poly: &[Vec3], near: f32) -> Vec<Vec3> {
    let plane_z = -near;
    let inside = |p: Vec3| p.z <= plane_z;
    let cross = |a: Vec3, b: Vec3| a + (b - a) * ((plane_z - a.z) / (b.z - a.z));
    let mut out = Vec::with_capacity(poly.len() + 2);
    for (i, &a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        match (inside(a), inside(b)) {
            (true, true) => out.push(b),
            (true, false) => out.push(cross(a, b)),
            (false, true) => {
                out.push(cross(a, b));
                out.push(b);
            }
            (false, false) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_keeps_polygon_in_front() {
        let quad = [
            Vec3::new(-1.0, 0.0, -2.0),
            Vec3::new(1.0, 0.0, -2.0),
            Vec3::new(1.0, 0.0, -3.0),
            Vec3::new(-1.0, 0.0, -3.0),
        ];
        assert_eq!(clip_near(&quad, 0.1).len(), 4);
    }

    #[test]
    fn test_clip_cuts_straddling_polygon() {
        let quad = [
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, -3.0),
            Vec3::new(-1.0, 0.0, -3.0),
        ];
        let clipped = clip_near(&quad, 0.5);
        assert_eq!(clipped.len(), 4);
        assert!(clipped.iter().all(|p| p.z <= -0.5 + 1e-6));
    }

    #[test]
    fn test_clip_drops_polygon_behind() {
        let tri = [Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 2.0), Vec3::new(-1.0, 0.0, 2.0)];
        assert!(clip_near(&tri, 0.1).is_empty());
    }
}

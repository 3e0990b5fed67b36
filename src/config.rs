//! Scene configuration, optionally supplied by the host page as a JSON
//! `<script type="application/json" id="scene-config">` block.

use serde::{Deserialize, Serialize};

use crate::model::Color;
use crate::state::tween::Ease;

pub const CONFIG_ELEMENT_ID: &str = "scene-config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub min_polar_deg: f32,
    pub max_polar_deg: f32,
    /// Wheel dolly limits on the distance to the orbit target.
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 1.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            min_polar_deg: 60.0,
            max_polar_deg: 80.0,
            min_distance: 2.0,
            max_distance: 20.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {
    /// Height of a sphere's centre while resting.
    pub rest_height: f32,
    /// How far a toggled sphere is lifted above `rest_height`.
    pub raise: f32,
    pub duration_secs: f64,
    pub ease: Ease,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self { rest_height: 0.5, raise: 1.0, duration_secs: 0.5, ease: Ease::OutQuad }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    /// Edge length of the square floor.
    pub size: f32,
    pub color: Color,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self { size: 50.0, color: Color::rgb(0x1b, 0x4f, 0x3a) }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallConfig {
    pub x: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default = "default_radius")]
    pub radius: f32,
    pub rest_color: Color,
    pub active_color: Color,
}

fn default_radius() -> f32 {
    0.5
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub toggle: ToggleConfig,
    pub floor: FloorConfig,
    pub sky: Color,
    pub red: BallConfig,
    pub green: BallConfig,
    pub blue: BallConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            toggle: ToggleConfig::default(),
            floor: FloorConfig::default(),
            sky: Color::rgb(0x29, 0x67, 0x77),
            red: BallConfig {
                x: -2.0,
                z: 0.0,
                radius: default_radius(),
                rest_color: Color::rgb(0xc1, 0x51, 0x51),
                active_color: Color::rgb(0xff, 0xc8, 0x57),
            },
            green: BallConfig {
                x: 2.0,
                z: 0.0,
                radius: default_radius(),
                rest_color: Color::rgb(0xa7, 0xf2, 0xa7),
                active_color: Color::rgb(0x2e, 0xa0, 0x43),
            },
            blue: BallConfig {
                x: 0.0,
                z: 0.0,
                radius: default_radius(),
                rest_color: Color::rgb(0x98, 0xf5, 0xf9),
                active_color: Color::rgb(0x1f, 0x6f, 0xeb),
            },
        }
    }
}

impl SceneConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut config: SceneConfig = serde_json::from_str(raw)?;
        config.sanitize();
        Ok(config)
    }

    /// Reads the page-provided config block, or defaults when absent or malformed.
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        match raw {
            Some(raw) if !raw.trim().is_empty() => match Self::from_json(&raw) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    fn sanitize(&mut self) {
        let t = &mut self.toggle;
        if !(t.raise >= 0.0) {
            t.raise = 0.0;
        }
        if !(t.duration_secs >= 0.0) {
            t.duration_secs = 0.0;
        }
        let c = &mut self.camera;
        if c.min_polar_deg > c.max_polar_deg {
            std::mem::swap(&mut c.min_polar_deg, &mut c.max_polar_deg);
        }
        c.min_polar_deg = c.min_polar_deg.clamp(0.1, 179.9);
        c.max_polar_deg = c.max_polar_deg.clamp(0.1, 179.9);
        if c.min_distance > c.max_distance {
            std::mem::swap(&mut c.min_distance, &mut c.max_distance);
        }
        c.min_distance = c.min_distance.max(1e-3);
        c.max_distance = c.max_distance.max(c.min_distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        assert_eq!(SceneConfig::from_json("{}").unwrap(), SceneConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SceneConfig::from_json(
            r##"{ "toggle": { "raise": 2.0 }, "sky": "#000000",
                 "red": { "x": -3.0, "rest_color": "#ff0000", "active_color": "#00ff00" } }"##,
        )
        .unwrap();
        assert_eq!(config.toggle.raise, 2.0);
        assert_eq!(config.toggle.rest_height, 0.5);
        assert_eq!(config.sky, Color::rgb(0, 0, 0));
        assert_eq!(config.red.x, -3.0);
        assert_eq!(config.red.radius, 0.5);
        assert_eq!(config.green, SceneConfig::default().green);
    }

    #[test]
    fn test_ease_names() {
        let config = SceneConfig::from_json(r#"{ "toggle": { "ease": "linear" } }"#).unwrap();
        assert_eq!(config.toggle.ease, Ease::Linear);
    }

    #[test]
    fn test_bad_color_is_an_error() {
        assert!(SceneConfig::from_json(r#"{ "sky": "blue" }"#).is_err());
    }

    #[test]
    fn test_negative_values_sanitized() {
        let config = SceneConfig::from_json(
            r#"{ "toggle": { "raise": -1.0, "duration_secs": -3.0 },
                 "camera": { "min_polar_deg": 80.0, "max_polar_deg": 60.0,
                             "min_distance": 30.0, "max_distance": 3.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.toggle.raise, 0.0);
        assert_eq!(config.toggle.duration_secs, 0.0);
        assert!(config.camera.min_polar_deg <= config.camera.max_polar_deg);
        assert_eq!((config.camera.min_distance, config.camera.max_distance), (3.0, 30.0));
    }
}

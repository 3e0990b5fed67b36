pub mod camera;
pub mod hit;
pub mod pointer;
pub mod stage;
pub mod toggle;
pub mod tween;

pub use camera::OrbitCamera;
pub use pointer::{ClientPoint, PointerInput};
pub use stage::Stage;

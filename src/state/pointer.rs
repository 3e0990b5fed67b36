// Pointer tracking: raw client coordinates -> normalized device coordinates.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub x: f64,
    pub y: f64,
}

/// Bounding rectangle of the render surface in client pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Maps a client point into [-1, 1] with y pointing up. Not clamped.
    pub fn normalize(&self, cx: f64, cy: f64) -> Option<PointerState> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        Some(PointerState {
            x: ((cx - self.left) / self.width) * 2.0 - 1.0,
            y: -((cy - self.top) / self.height) * 2.0 + 1.0,
        })
    }
}

pub trait RenderSurface {
    fn bounds(&self) -> SurfaceRect;
}

impl RenderSurface for SurfaceRect {
    fn bounds(&self) -> SurfaceRect {
        *self
    }
}

impl RenderSurface for web_sys::Element {
    fn bounds(&self) -> SurfaceRect {
        let r = self.get_bounding_client_rect();
        SurfaceRect::new(r.left(), r.top(), r.width(), r.height())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    MouseMove(ClientPoint),
    /// Active touch points, in the browser's order.
    TouchStart(Vec<ClientPoint>),
    TouchMove(Vec<ClientPoint>),
    TouchEnd { remaining: u32 },
}

#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    pointer: PointerState,
    touch_active: bool,
}

impl PointerTracker {
    pub fn current(&self) -> PointerState {
        self.pointer
    }

    pub fn touch_active(&self) -> bool {
        self.touch_active
    }

    pub fn on_raw_event(&mut self, input: &PointerInput, surface: &impl RenderSurface) {
        let point = match input {
            PointerInput::MouseMove(p) => Some(*p),
            PointerInput::TouchStart(touches) => {
                let first = touches.first().copied();
                self.touch_active = first.is_some();
                first
            }
            PointerInput::TouchMove(touches) if self.touch_active => touches.first().copied(),
            PointerInput::TouchMove(_) => None,
            PointerInput::TouchEnd { remaining } => {
                if *remaining == 0 {
                    self.touch_active = false;
                }
                None
            }
        };
        let Some(point) = point else { return };
        if let Some(p) = surface.bounds().normalize(point.x, point.y) {
            self.pointer = p;
        }
    }
}

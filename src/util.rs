// Small browser helpers shared by the components.

use web_sys::TouchList;

use crate::state::ClientPoint;

/// Wall-clock seconds; one clock for both frames and input events.
pub fn now_secs() -> f64 {
    js_sys::Date::now() / 1000.0
}

pub fn touch_points(list: &TouchList) -> Vec<ClientPoint> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| ClientPoint { x: t.client_x() as f64, y: t.client_y() as f64 })
        .collect()
}

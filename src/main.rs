mod components;
mod config;
mod dom;
mod math;
mod model;
mod state;
mod util;

use components::app::App;

fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("sphere-picker starting");
    yew::Renderer::<App>::new().render();
}

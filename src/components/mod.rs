pub mod app;
pub mod message_panel;
mod painter;
pub mod scene_view;

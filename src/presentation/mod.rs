// Presentation layer - Map view model and HTTP surface
pub mod app_state;
pub mod handlers;
pub mod map_view;

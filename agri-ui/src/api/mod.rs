//! HTTP API handlers for the agri service

pub mod assistant;
pub mod calendar;
pub mod crops;
pub mod health;
pub mod predict;
pub mod screen;
pub mod water;

pub use assistant::ask_assistant;
pub use calendar::query_calendar;
pub use crops::{get_crop, list_crops};
pub use health::health_routes;
pub use predict::{predict_disease, predict_water};
pub use screen::{get_screen, set_screen};
pub use water::{calculate_water, water_catalogue};

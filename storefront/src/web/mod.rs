pub mod handlers;
pub mod render;
pub mod service;
pub mod sessions;

pub mod config;
pub mod drive;
pub mod error;
pub mod exporter;
pub mod messages;
pub mod render;
pub mod scene;

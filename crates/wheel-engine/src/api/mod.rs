pub mod app;
pub mod context;
pub mod error;
pub mod sound;
pub mod types;
pub mod wheel;

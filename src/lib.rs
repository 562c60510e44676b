pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod headless;
pub mod location;
pub mod map;
pub mod render;
pub mod session;
pub mod state;
pub mod store;
pub mod types;

#![warn(clippy::all, rust_2018_idioms)]

pub use app::App;
mod app;
pub mod config;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

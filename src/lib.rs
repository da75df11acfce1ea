pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod copy;
pub mod page;
pub mod topbar;
pub mod validate;
pub mod view;

#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::start;

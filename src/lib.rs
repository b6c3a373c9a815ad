pub mod app;
pub mod auth;
pub mod categories;
pub mod config;
pub mod email;
pub mod error;
pub mod extract;
pub mod memory;
pub mod responses;
pub mod state;

//! CSH member statistics dashboard.
//!
//! The [`data`] module is the computational core (filtering, distributions,
//! growth). Everything else is the native shell around it.

pub mod app;
pub mod auth;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;

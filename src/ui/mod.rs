//! egui rendering of the dashboard. Every widget reads from and writes to
//! [`crate::state::AppState`]; no computation lives here.

pub mod metrics;
pub mod panels;
pub mod plot;
pub mod statistics;

//! Engagement-driven short-video feed simulation.
//!
//! The feed starts by profiling the viewer with random picks, then narrows
//! toward their strongest interests once enough engagement has been seen.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

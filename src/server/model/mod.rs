//! Server application models and type definitions.
//!
//! This module contains data models for the server application, including application
//! state and background task job definitions. These models bridge the gap between
//! database entities, HTTP handlers, and background workers.

pub mod app;
pub mod task;

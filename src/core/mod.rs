//! Core application module
//!
//! This module contains:
//! - Application shell with login and role-gated navigation
//! - External collaborators (dashboard data, grading submission)
//! - Scripted replay of an evaluation session

pub mod app;
pub mod data;
pub mod replay;
pub mod routes;
pub mod submit;

//! Answer-sheet evaluation: annotation overlay, marking session and the
//! collaborators around them

pub mod annotations;
pub mod capture;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod session;
pub mod surface;

//! Report formatters for the check command

pub mod json;
pub mod pretty;

//! Built-in fix definitions, grouped by project

pub mod cmip5;
pub mod common;

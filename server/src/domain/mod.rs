//! Domain models

pub mod descriptor;
pub mod field;
pub mod project;
pub mod workspace;

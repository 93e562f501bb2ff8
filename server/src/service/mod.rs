//! Service layer

pub mod descriptor;
pub mod project;
pub mod workspace;

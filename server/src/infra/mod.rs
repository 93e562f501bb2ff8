//! Infrastructure layer

pub mod descriptor_io;
pub mod descriptor_repository;
pub mod paths;
pub mod private_catalogue;
pub mod project_descriptor;
pub mod project_repository;
pub mod schema_cache;
pub mod sqlite;
pub mod workspace_descriptor;
pub mod workspace_repository;

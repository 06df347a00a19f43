//! Core traits, settings, module registry and the entity/DTO mapper.

pub mod mapper;
pub mod module;
pub mod registry;
pub mod settings;

pub use mapper::{MapError, Mapper, MapperBuilder};
pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;

//! Configuration loading (TOML files merged via figment)

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileOrchestratorConfig, FileProviderConfig, FileSpecialistConfig,
};
pub use loader::ConfigLoader;

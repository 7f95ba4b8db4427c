//! Build configuration: environment, optional settings file, validation.
pub mod environment;
pub mod settings;
pub mod toml_loader;
pub mod validation;

pub use environment::Environment;
pub use settings::Settings;

pub mod config;
pub mod structure;
pub mod util;

pub use config::ConverterConfig;
pub use structure::{DocumentEngine, EngineOptions, StructuredDocument};

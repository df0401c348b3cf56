//! mkcomp core
//!
//! Abbreviation expansion and React component generation.
//! This crate provides the abbreviation engine that turns shorthand such as
//! `div.card>h2.title+p` into markup, plus the component generator, YAML
//! manifest processor and project configuration used by the `mkcomp` CLI.

pub mod abbreviation;
pub mod config;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod result;

// Re-export commonly used types
pub use abbreviation::{
    AbbreviationError, AbbreviationErrorKind, ExpandConfig, ExpandOptions, OutputHooks,
    SnippetRegistry, Syntax, expand, parse_abbreviation,
};
pub use config::{ConfigLoader, DefaultsConfiguration, ExpandConfiguration, ProjectConfig};
pub use error::{ErrorKind, MkcompError};
pub use generator::{
    BatchGenerator, BatchSummary, ComponentFile, ComponentGenerator, ComponentRequest,
    ComponentType, FileKind, MarkupProcessor, PropsParser, StyleType, Structure, TypeSetting,
    validate_component_name,
};
pub use manifest::{Manifest, ManifestOverrides, ManifestProcessor, ManifestTemplate};
pub use result::{Result, ResultExt};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mkcomp=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

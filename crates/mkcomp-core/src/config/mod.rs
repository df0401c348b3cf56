//! Project configuration
//!
//! Settings live in the first of `.mkcomprc.json`, `.mkcomprc.toml`,
//! `.mkcomprc.yaml`, `mkcomp.yaml` or `mkcomp.yml` found walking up from the
//! working directory:
//!
//! ```yaml
//! defaults:
//!   type: tsx
//!   style: scss
//!   directory: src/components
//! expand:
//!   indent: "  "
//!   selfClosingStyle: xhtml
//!   bem: true
//! ```
//!
//! Command-line flags override file values, which override built-in defaults.

mod loader;
mod project;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use project::{DefaultsConfiguration, ExpandConfiguration, ProjectConfig};

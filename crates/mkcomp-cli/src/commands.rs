//! CLI command implementations

use mkcomp_core::abbreviation::{self, ExpandConfig, Syntax};
use mkcomp_core::config::ProjectConfig;
use mkcomp_core::generator::{
    BatchGenerator, ComponentGenerator, ComponentRequest, ComponentType, Structure, files,
};
use mkcomp_core::manifest::{
    DEFAULT_TEMPLATE_FILE, ManifestOverrides, ManifestProcessor, ManifestTemplate,
};
use mkcomp_core::{MkcompError, Result, StyleType, TypeSetting};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::output;

/// Single-component options from the command line
#[derive(Debug, Clone)]
pub struct ComponentArgs {
    pub name: String,
    pub props: String,
    pub dir: Option<PathBuf>,
    pub style: Option<StyleType>,
    pub emmet: Option<String>,
    pub test: bool,
    pub jsx: bool,
    pub tsx: bool,
    /// Arguments as typed, recorded in file headers
    pub command_line: String,
}

fn generator_for(config: &ProjectConfig) -> ComponentGenerator {
    ComponentGenerator::new(config.expand_config(ExpandConfig::for_syntax(Syntax::Jsx)))
}

/// Generate one component
pub fn component_command(args: ComponentArgs, config: &ProjectConfig) -> Result<()> {
    let defaults = config.defaults();

    let request = ComponentRequest {
        name: args.name,
        props: args.props,
        directory: args
            .dir
            .or_else(|| defaults.directory.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(".")),
        style: args.style.or(defaults.style).unwrap_or_default(),
        structure: Structure::Abbreviation(args.emmet.unwrap_or_default()),
        component_type: ComponentType::resolve(
            args.jsx,
            args.tsx,
            defaults.component_type.unwrap_or(TypeSetting::Auto),
        ),
        command: Some(format!("mkcomp {}", args.command_line)),
        ..Default::default()
    };
    debug!("Component request: {:?}", request);

    let rendered = generator_for(config).render(&request)?;

    if args.test {
        print!("{}", files::preview(&rendered));
        return Ok(());
    }

    let report = files::write_files(&rendered, &request.directory);
    for path in &report.written {
        output::print_created(path);
    }

    match report.failed.into_iter().next() {
        None => {
            output::print_success(&format!("Component {} generated", request.name));
            Ok(())
        }
        Some((path, error)) => Err(MkcompError::io_error(path, std::io::Error::other(error))),
    }
}

/// Generate the components of a YAML manifest
pub fn yaml_command(
    file: &Path,
    only: &[String],
    test: bool,
    dir: Option<PathBuf>,
    config: &ProjectConfig,
) -> Result<()> {
    let overrides = ManifestOverrides {
        directory: dir,
        project: config.defaults(),
    };

    let mut requests = ManifestProcessor::process_file(file, &overrides)?;
    if !only.is_empty() {
        requests = ManifestProcessor::filter(requests, only);
    }
    info!("{} component(s) selected from {}", requests.len(), file.display());

    if test {
        print!("{}", BatchGenerator::preview(&requests));
        return Ok(());
    }

    let summary = BatchGenerator::new(generator_for(config)).generate_all(&requests);
    for path in &summary.files_written {
        output::print_created(path);
    }
    output::print_batch_summary(&summary);

    if summary.has_failures() {
        return Err(MkcompError::validation_error(format!(
            "{} of {} component(s) failed",
            summary.failures.len(),
            requests.len()
        )));
    }
    Ok(())
}

/// Write an example manifest
pub fn template_command(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_FILE));
    ManifestTemplate::write(&path, &ManifestTemplate::full()?)?;

    output::print_created(&path);
    println!("Edit the file, then run: mkcomp --from-yaml {}", path.display());
    Ok(())
}

/// Print an abbreviation's expansion
pub fn print_command(source: &str, syntax: Syntax, config: &ProjectConfig) -> Result<()> {
    let expand_config = config.expand_config(ExpandConfig::for_syntax(syntax));
    let markup = abbreviation::expand(source, &expand_config)
        .map_err(|e| MkcompError::abbreviation(e, source))?;
    println!("{markup}");
    Ok(())
}

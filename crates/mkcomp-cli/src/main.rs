//! mkcomp CLI
//!
//! Command-line interface for generating React components from abbreviations

mod commands;
mod output;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};
use mkcomp_core::config::ConfigLoader;
use mkcomp_core::{Result, StyleType, Syntax, init_tracing};
use std::io;
use std::path::PathBuf;
use tracing::debug;

use crate::commands::ComponentArgs;

#[derive(Parser)]
#[command(name = "mkcomp")]
#[command(about = "mkcomp: generate React components with abbreviation-based markup")]
#[command(version = mkcomp_core::VERSION)]
#[command(
    long_about = "mkcomp scaffolds React components (.tsx/.jsx) with an optional stylesheet.\n\
Markup is written as an abbreviation such as div.card>h2.title+p and expanded into JSX.\n\
\n\
Examples:\n  \
mkcomp Button                                   # Button.tsx + Button.css\n  \
mkcomp Card -p \"title:string,children\" -s tailwind\n  \
mkcomp Modal -d src/components -e \"div.modal>div.content>h2+p\"\n  \
mkcomp --template                               # Write components.yaml\n  \
mkcomp --from-yaml components.yaml --only Button,Modal\n  \
mkcomp --print -e \"ul>li.item*3\" --syntax html"
)]
struct Cli {
    /// Component name in PascalCase
    #[arg(help = "Component name in PascalCase (e.g. Button, UserCard)")]
    component_name: Option<String>,

    /// Component props
    #[arg(
        short,
        long,
        default_value = "",
        help = "Props, e.g. \"title:string,count?:number,children\""
    )]
    props: String,

    /// Output directory
    #[arg(short, long, help = "Output directory (default: current directory)")]
    dir: Option<PathBuf>,

    /// Style type
    #[arg(short, long, value_enum, help = "Style type (default: css)")]
    style: Option<StyleArg>,

    /// Abbreviation for the component markup
    #[arg(short = 'e', long = "emmet", value_name = "ABBREVIATION")]
    emmet: Option<String>,

    /// Preview without writing files
    #[arg(long, help = "Dry run: print generated files instead of writing them")]
    test: bool,

    /// Force JavaScript output
    #[arg(long, conflicts_with = "tsx", help = "Generate .jsx files")]
    jsx: bool,

    /// Force TypeScript output
    #[arg(long, help = "Generate .tsx files")]
    tsx: bool,

    /// Generate every component listed in a YAML manifest
    #[arg(long, value_name = "FILE", conflicts_with_all = ["component_name", "template", "print"])]
    from_yaml: Option<PathBuf>,

    /// Restrict manifest generation to these components
    #[arg(long, value_delimiter = ',', requires = "from_yaml", value_name = "NAMES")]
    only: Vec<String>,

    /// Write an example manifest
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        conflicts_with_all = ["component_name", "print"]
    )]
    template: Option<Option<PathBuf>>,

    /// Print the expansion of the abbreviation given with -e
    #[arg(long, requires = "emmet", conflicts_with = "component_name")]
    print: bool,

    /// Output syntax for --print
    #[arg(long, value_enum, default_value = "html")]
    syntax: SyntaxArg,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.mkcomprc.json/.mkcomprc.toml/mkcomp.yaml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Generate shell completion script
    #[arg(long, value_enum, help = "Generate completion script for specified shell")]
    generate_completion: Option<Shell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Css,
    Scss,
    Tailwind,
    Styled,
    None,
}

impl From<StyleArg> for StyleType {
    fn from(value: StyleArg) -> Self {
        match value {
            StyleArg::Css => StyleType::Css,
            StyleArg::Scss => StyleType::Scss,
            StyleArg::Tailwind => StyleType::Tailwind,
            StyleArg::Styled => StyleType::Styled,
            StyleArg::None => StyleType::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SyntaxArg {
    Html,
    Xhtml,
    Xml,
    Xsl,
    Jsx,
    Pug,
    Haml,
    Slim,
}

impl From<SyntaxArg> for Syntax {
    fn from(value: SyntaxArg) -> Self {
        match value {
            SyntaxArg::Html => Syntax::Html,
            SyntaxArg::Xhtml => Syntax::Xhtml,
            SyntaxArg::Xml => Syntax::Xml,
            SyntaxArg::Xsl => Syntax::Xsl,
            SyntaxArg::Jsx => Syntax::Jsx,
            SyntaxArg::Pug => Syntax::Pug,
            SyntaxArg::Haml => Syntax::Haml,
            SyntaxArg::Slim => Syntax::Slim,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return;
    }

    // Initialize colored output
    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "mkcomp=warn",
        1 => "mkcomp=info",
        2 => "mkcomp=debug",
        _ => "mkcomp=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    if let Err(e) = run(cli) {
        output::print_error(&e);
        std::process::exit(1);
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run(cli: Cli) -> Result<()> {
    if let Some(path) = cli.template {
        return commands::template_command(path);
    }

    let config = ConfigLoader::load(cli.config.as_deref(), None)?;
    debug!("Loaded configuration: {:?}", config);

    if cli.print {
        let abbreviation = cli.emmet.unwrap_or_default();
        return commands::print_command(&abbreviation, cli.syntax.into(), &config);
    }

    if let Some(file) = cli.from_yaml {
        return commands::yaml_command(&file, &cli.only, cli.test, cli.dir, &config);
    }

    let args = ComponentArgs {
        name: cli.component_name.unwrap_or_default(),
        props: cli.props,
        dir: cli.dir,
        style: cli.style.map(StyleType::from),
        emmet: cli.emmet,
        test: cli.test,
        jsx: cli.jsx,
        tsx: cli.tsx,
        command_line: std::env::args().skip(1).collect::<Vec<_>>().join(" "),
    };
    commands::component_command(args, &config)
}

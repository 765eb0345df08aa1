//! Site Composer CLI
//!
//! Usage:
//!   site-composer [OPTIONS] [CONFIG]
//!
//! Options:
//!   -t, --template <ID>      Template to render
//!   --theme <NAME>           Theme of the template
//!   -p, --page <KEY>         Page to render
//!   -w, --width <PX>         Container width
//!   -d, --device <CLASS>     Device preview (mobile, tablet, desktop)
//!   -e, --edit               Render in edit mode
//!   -f, --feature <K=V>      Set a feature flag (repeatable)
//!   --list-templates         List built-in templates and exit
//!   -v, --verbose            Debug logging on stderr
//!   -h, --help               Print help

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use site_composer::{
    render_or_not_found, Breakpoint, CompositionError, CompositionProps, ConfigError, SiteConfig,
    TemplateRegistry, ThemeArena, Viewport,
};

#[derive(Parser)]
#[command(name = "site-composer")]
#[command(about = "Render a page of a built-in website template to HTML")]
struct Cli {
    /// Site configuration file (TOML format)
    config: Option<PathBuf>,

    /// Template to render
    #[arg(short, long)]
    template: Option<String>,

    /// Theme of the template
    #[arg(long)]
    theme: Option<String>,

    /// Page to render; unknown or disabled pages render the home page
    #[arg(short, long)]
    page: Option<String>,

    /// Container width in pixels
    #[arg(short, long)]
    width: Option<u32>,

    /// Device preview, overriding the width
    #[arg(short, long)]
    device: Option<Breakpoint>,

    /// Render with edit affordances
    #[arg(short, long)]
    edit: bool,

    /// Feature flag as name=bool, e.g. about_page=true
    #[arg(short, long = "feature", value_parser = parse_feature)]
    features: Vec<(String, bool)>,

    /// List built-in templates and their themes
    #[arg(long)]
    list_templates: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_feature(arg: &str) -> Result<(String, bool), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=bool, got '{}'", arg))?;
    let value = value
        .trim()
        .parse::<bool>()
        .map_err(|_| format!("expected true or false for '{}', got '{}'", name, value))?;
    Ok((name.trim().to_string(), value))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = TemplateRegistry::builtin();

    if cli.list_templates {
        for template in registry.iter() {
            let themes: Vec<&str> = template.themes.names().collect();
            println!(
                "{:<8} {:<11} {} (themes: {})",
                template.id,
                template.category,
                template.name,
                themes.join(", ")
            );
        }
        return;
    }

    // Load site configuration
    let config = match &cli.config {
        Some(path) => match SiteConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => SiteConfig::default(),
    };

    let props = match build_props(config, &cli) {
        Ok(props) => props,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut arena = ThemeArena::new();
    match render_or_not_found(registry, props, &mut arena) {
        Ok(outcome) if outcome.is_not_found() => {
            println!("{}", outcome.html());
            std::process::exit(1);
        }
        Ok(outcome) => {
            println!("{}", outcome.html());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Layer command-line flags over the configuration file
fn build_props(mut config: SiteConfig, cli: &Cli) -> Result<CompositionProps, CompositionError> {
    if let Some(template) = &cli.template {
        config.template = Some(template.clone());
    }
    if config.template.is_none() {
        return Err(ConfigError::MissingTemplate.into());
    }
    if let Some(theme) = &cli.theme {
        config.theme = Some(theme.clone());
    }
    if let Some(page) = &cli.page {
        config.page = Some(page.clone());
    }
    if cli.edit {
        config.edit = true;
    }
    for (name, enabled) in &cli.features {
        config.features.insert(name.clone(), *enabled);
    }

    let mut props = config.into_props()?;
    if let Some(device) = cli.device {
        props = props.with_viewport(Viewport::Override(device));
    } else if let Some(width) = cli.width {
        props = props.with_viewport(Viewport::Measured(width));
    } else if props.viewport == Viewport::default() {
        props = props.with_viewport(Viewport::Measured(Breakpoint::Desktop.preview_width()));
    }
    Ok(props)
}

//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use spherexsphinx_core::{
    AssetBundle, DerivationContext, GitRepositoryLookup, build_settings, technote_settings,
};
use spherexsphinx_crossref::{RoleRegistry, resolve};
use spherexsphinx_shared::{ResolvedConfiguration, VERSION, load_config, load_config_from};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// spherexsphinx: configuration and cross-referencing for SPHEREx docs.
#[derive(Parser)]
#[command(
    name = "spherexsphinx",
    version,
    about = "Validate spherexsphinx.toml, derive generator settings, resolve spherexdoc links.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Documentation directory holding spherexsphinx.toml.
    #[arg(short = 'C', long, default_value = ".", global = true)]
    pub dir: PathBuf,

    /// Explicit configuration file (skips the lookup in --dir).
    #[arg(long, env = "SPHEREXSPHINX_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Settings preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Preset {
    Base,
    Technote,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Validate the configuration file and summarize it.
    Check,

    /// Derive the generator settings and print them as JSON.
    Settings {
        /// Which preset to derive.
        #[arg(short, long, default_value = "base")]
        preset: Preset,
    },

    /// Resolve the text of a spherexdoc role to its link.
    Resolve {
        /// Role text, e.g. "SSDC-MS-001" or "Raw Data <SSDC-MS-002>".
        text: String,
    },

    /// Expand inline roles in a file and print the result.
    Expand {
        /// File to expand.
        file: PathBuf,
    },

    /// Print the absolute path of a bundled static asset.
    Asset {
        /// Asset file name.
        name: String,
    },

    /// Print the package version.
    Version,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "spherexsphinx=warn",
        1 => "spherexsphinx=info",
        2 => "spherexsphinx=debug",
        _ => "spherexsphinx=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Check => cmd_check(&cli),
        Command::Settings { preset } => cmd_settings(&cli, *preset),
        Command::Resolve { text } => cmd_resolve(text),
        Command::Expand { file } => cmd_expand(file),
        Command::Asset { name } => cmd_asset(name),
        Command::Version => {
            println!("spherexsphinx {VERSION}");
            Ok(())
        }
    }
}

/// Load the declarative configuration once for this invocation.
fn load_configuration(cli: &Cli) -> Result<ResolvedConfiguration> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config(&cli.dir)?,
    };
    info!(title = %config.title(), "loaded configuration");
    Ok(config)
}

fn cmd_check(cli: &Cli) -> Result<()> {
    let config = load_configuration(cli)?;
    let project = config.project();

    println!();
    println!("  Configuration is valid.");
    println!("  Title:      {}", project.title());
    println!("  Version:    {}", project.version());
    println!("  Copyright:  {}", project.copyright());
    if let Some(url) = project.base_url() {
        println!("  Base URL:   {url}");
    }
    if let Some(url) = project.repository_url() {
        println!("  Repository: {url} ({})", project.default_branch());
    }
    println!("  Intersphinx projects: {}", config.intersphinx().len());
    println!("  Extra extensions:     {}", config.extensions().len());
    println!();

    Ok(())
}

fn cmd_settings(cli: &Cli, preset: Preset) -> Result<()> {
    let config = load_configuration(cli)?;

    let ctx = DerivationContext {
        docs_dir: cli.dir.clone(),
        assets: AssetBundle::installed(),
        repository: &GitRepositoryLookup,
    };

    let mut settings = build_settings(&config, &ctx)?;
    if preset == Preset::Technote {
        settings = technote_settings(settings, &ctx.assets, &ctx.docs_dir)?;
    }

    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn cmd_resolve(text: &str) -> Result<()> {
    let link = resolve(text);
    println!("{} -> {}", link.display_text, link.target_url());
    Ok(())
}

fn cmd_expand(file: &Path) -> Result<()> {
    let input = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("failed to read {}", file.display()))?;

    let mut registry = RoleRegistry::new();
    spherexsphinx_crossref::setup(&mut registry);

    print!("{}", registry.expand(&input));
    Ok(())
}

fn cmd_asset(name: &str) -> Result<()> {
    let path = AssetBundle::installed().get_asset_path(name)?;
    println!("{}", path.display());
    Ok(())
}

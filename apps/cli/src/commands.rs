//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use readmepack_core::pipeline::{PackResult, ProgressReporter};
use readmepack_core::walker::WalkPolicy;
use readmepack_shared::{
    AppConfig, PackOptions, PackOverrides, PackVariant, init_config, load_config,
    load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// readmepack — package a Markdown documentation tree for import.
///
/// Without a subcommand, packs the configured root directory into a zip
/// archive. Every pack option can also be given through the CI input
/// variables (`INPUT_ROOT-DIRECTORY`, ...).
#[derive(Parser)]
#[command(
    name = "readmepack",
    version,
    about = "Flatten a Markdown docs tree, rewrite its front matter, and zip it for import.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.readmepack/readmepack.toml).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub pack: PackArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Options of the default pack run.
#[derive(Args, Debug)]
pub(crate) struct PackArgs {
    /// Directory receiving the working tree and the archive.
    #[arg(long, env = "INPUT_DESTINATION-DIRECTORY")]
    pub destination_directory: Option<String>,

    /// Documentation tree to package.
    #[arg(long, env = "INPUT_ROOT-DIRECTORY")]
    pub root_directory: Option<String>,

    /// File name of the produced archive.
    #[arg(long, env = "INPUT_ZIP-FILENAME")]
    pub zip_filename: Option<String>,

    /// Name fragment identifying index files.
    #[arg(long, env = "INPUT_INDEX-NAME")]
    pub index_name: Option<String>,

    /// Working directory name (versioned variant).
    #[arg(long, env = "INPUT_VERSION-CODE")]
    pub version_code: Option<String>,

    /// Pipeline variant: mirror or versioned.
    #[arg(long, env = "INPUT_VARIANT")]
    pub variant: Option<PackVariant>,
}

impl From<PackArgs> for PackOverrides {
    fn from(args: PackArgs) -> Self {
        Self {
            destination_directory: args.destination_directory,
            root_directory: args.root_directory,
            zip_filename: args.zip_filename,
            index_name: args.index_name,
            version_code: args.version_code,
            variant: args.variant,
        }
    }
}

/// Subcommands besides the default pack run.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print a single Markdown file as it would be written to the archive.
    Normalize {
        /// Markdown file to rewrite.
        file: PathBuf,

        /// Variant whose rewriting rules to apply.
        #[arg(long, default_value = "mirror")]
        variant: PackVariant,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so `normalize`
/// output stays clean.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = ["readmepack", "readmepack_core", "readmepack_markdown", "readmepack_shared"]
        .map(|target| format!("{target}={level}"))
        .join(",");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
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
// Failure reporting
// ---------------------------------------------------------------------------

/// Surface a failure to a GitHub Actions runner as an error annotation.
pub(crate) fn report_failure(err: &color_eyre::Report) {
    if std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
        println!("::error::{}", escape_workflow_data(&format!("{err:#}")));
    }
}

/// Escape a message for a workflow command.
fn escape_workflow_data(msg: &str) -> String {
    msg.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config_file.as_deref())?;

    match cli.command {
        None => cmd_pack(&config, cli.pack.into()).await,
        Some(Command::Normalize { file, variant }) => cmd_normalize(&config, &file, variant),
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

async fn cmd_pack(config: &AppConfig, overrides: PackOverrides) -> Result<()> {
    let options = PackOptions::resolve(config, &overrides)?;

    info!(
        root = %options.root_dir.display(),
        destination = %options.destination_dir.display(),
        zip = %options.zip_filename,
        variant = %options.variant,
        "packing documentation"
    );

    let reporter = CliProgress::new();
    let result = readmepack_core::pipeline::run_pack(&options, &reporter).await?;

    // Print summary
    println!();
    println!("  Archive created successfully!");
    println!("  Path:     {}", result.archive.path.display());
    println!("  Pages:    {}", result.walk.files_written);
    println!("  Indexes:  {}", result.walk.indexes_promoted);
    println!("  Pruned:   {}", result.walk.dirs_pruned);
    println!("  Size:     {} bytes", result.archive.size_bytes);
    println!("  SHA-256:  {}", result.archive.sha256);
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_normalize(config: &AppConfig, file: &Path, variant: PackVariant) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("failed to read '{}'", file.display()))?;

    let markers = config.markdown.toc_markers();
    let line_ending = config.markdown.line_ending;
    let policy = match variant {
        PackVariant::Mirror => WalkPolicy::mirror(&*config.pack.index_name, line_ending),
        PackVariant::Versioned => {
            WalkPolicy::versioned(&*config.pack.index_name, markers, line_ending)
        }
    };

    print!("{}", readmepack_markdown::normalize(&raw, &policy.normalize));
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_written(&self, path: &Path, count: usize) {
        self.spinner
            .set_message(format!("Writing [{count}] {}", path.display()));
    }

    fn done(&self, _result: &PackResult) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    // A failed run never reaches `done`.
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn pack_flags_parse_without_subcommand() {
        let cli = Cli::try_parse_from([
            "readmepack",
            "--root-directory",
            "site/docs",
            "--zip-filename",
            "site.zip",
            "--variant",
            "versioned",
            "--version-code",
            "v4",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        let overrides = PackOverrides::from(cli.pack);
        assert_eq!(overrides.root_directory.as_deref(), Some("site/docs"));
        assert_eq!(overrides.variant, Some(PackVariant::Versioned));
        assert_eq!(overrides.version_code.as_deref(), Some("v4"));
    }

    #[test]
    fn config_flag_selects_config_file() {
        let cli = Cli::try_parse_from(["readmepack", "--config", "ci/readmepack.toml"]).unwrap();
        assert_eq!(cli.config_file, Some(PathBuf::from("ci/readmepack.toml")));
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["readmepack", "config", "show", "--config", "a.toml"])
            .unwrap();
        assert_eq!(cli.config_file, Some(PathBuf::from("a.toml")));
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));
    }

    #[test]
    fn spinner_is_cleared_when_run_fails() {
        let progress = CliProgress::new();
        let spinner = progress.spinner.clone();
        progress.phase("Normalizing documents");

        drop(progress);
        assert!(spinner.is_finished());
    }

    #[test]
    fn normalize_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "readmepack",
            "normalize",
            "docs/index.md",
            "--variant",
            "versioned",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Normalize { file, variant }) => {
                assert_eq!(file, PathBuf::from("docs/index.md"));
                assert_eq!(variant, PackVariant::Versioned);
            }
            _ => panic!("expected normalize subcommand"),
        }
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(Cli::try_parse_from(["readmepack", "--variant", "flat"]).is_err());
    }

    #[test]
    fn workflow_messages_are_escaped() {
        assert_eq!(
            escape_workflow_data("100% failed\nsee log\r"),
            "100%25 failed%0Asee log%0D"
        );
    }
}

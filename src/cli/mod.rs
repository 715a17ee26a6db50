pub mod args;
pub mod commands;

use clap::{CommandFactory, Parser, Subcommand};

use crate::error::{PodError, Result};

/// Italian POD resolver
#[derive(Parser, Debug)]
#[command(
    name = "gse-pod",
    about = "Resolve an Italian electricity POD to its primary substation, supplier, regions, provinces and municipalities",
    version,
    author,
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// POD code to resolve (same as `gse-pod resolve <POD>`)
    pub pod: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "GSE_POD_TIMEOUT",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// GSE ArcGIS REST root
    #[arg(long, global = true, env = "GSE_POD_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// One `label: value` line per field
    Plain,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a POD code
    #[command(alias = "r")]
    Resolve(args::ResolveArgs),

    /// Check POD codes offline
    #[command(alias = "v")]
    Validate(args::ValidateArgs),

    /// Translate ISTAT region and province codes
    #[command(alias = "i")]
    Istat(args::IstatArgs),

    /// Manage configuration
    #[command(alias = "c")]
    Config(args::ConfigArgs),

    /// Show version information
    Version,
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub verbose: bool,
    pub quiet: bool,
    pub format: OutputFormat,
    pub timeout: Option<u64>,
    pub base_url: Option<String>,
}

impl Cli {
    fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            verbose: self.verbose,
            quiet: self.quiet,
            format: self.format,
            timeout: self.timeout,
            base_url: self.base_url.clone(),
        }
    }

    /// Run the CLI application
    pub async fn run() -> Result<()> {
        let cli = Self::parse();

        // Set up logging
        let default_filter = if cli.verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
            .init();

        let options = cli.global_options();

        let result = match cli.command {
            Some(Commands::Resolve(args)) => commands::resolve::execute(&args.pod, &options).await,
            Some(Commands::Validate(args)) => commands::validate::execute(args, options.format),
            Some(Commands::Istat(args)) => commands::istat::execute(args, options.format),
            Some(Commands::Config(args)) => commands::config::execute(args),
            Some(Commands::Version) => {
                commands::version::execute();
                Ok(())
            }
            None => match cli.pod.as_deref() {
                Some(pod) => commands::resolve::execute(pod, &options).await,
                None => {
                    eprintln!("{}", Self::command().render_usage());
                    Err(PodError::MissingArgument("POD code".to_string()))
                }
            },
        };

        // Handle errors with better messaging
        if let Err(e) = &result {
            report_error(e, cli.verbose);
        }
        result
    }
}

fn report_error(e: &PodError, verbose: bool) {
    match e {
        PodError::Resolution { stage, source } => {
            eprintln!("Error: POD resolution failed while {}.", stage);
            eprintln!("Cause: {}", source);
        }
        PodError::ApiError { code, message, .. } => {
            eprintln!("Error: {}", message);
            if verbose {
                eprintln!("Code: {}", code);
            }
        }
        PodError::Network(err) => {
            eprintln!("Network error: {}", err);
        }
        PodError::Parse(msg) => {
            eprintln!("Error parsing response: {}", msg);
            if !verbose {
                eprintln!("\nRun with --verbose for more details.");
            }
        }
        _ => {
            eprintln!("Error: {}", e);
        }
    }

    if let Some(hint) = e.hint() {
        eprintln!("\nHint: {}", hint);
    }
}

use clap::{Args, Subcommand};

/// Resolve command arguments
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// POD code to resolve (e.g., IT001E12345678)
    pub pod: String,
}

/// Validate command arguments
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// POD codes to check
    #[arg(required = true)]
    pub pods: Vec<String>,
}

/// ISTAT lookup arguments
#[derive(Args, Debug)]
pub struct IstatArgs {
    #[command(subcommand)]
    pub command: IstatCommand,
}

#[derive(Subcommand, Debug)]
pub enum IstatCommand {
    /// Translate a region code (e.g., 12 or "12")
    Region {
        /// Region code
        code: String,
    },

    /// Translate a province code (e.g., 58 or "058")
    Province {
        /// Province code
        code: String,
    },

    /// List all region codes
    Regions,

    /// List all province codes
    Provinces,
}

/// Configuration command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., gse.timeout)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show all configuration values
    List,

    /// Show configuration file path
    Path,
}

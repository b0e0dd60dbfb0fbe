//! cftool - main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cftool::commands::{
    check::{self, CheckArgs},
    convert::{self, ConvertArgs},
    list_tags,
    update_stack::{self, UpdateStackArgs},
    validate::{self, ValidateArgs},
};
use cftool::config::{Config, ConfigOverrides};

#[derive(Parser)]
#[command(name = "cftool")]
#[command(about = "Convert short-form intrinsic function tags and validate deployment templates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to $CFTOOL_CONFIG, then ~/.config/cftool/main.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Credentials profile
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Region, also used to pick `<region>.json` from the specification directory
    #[arg(long, global = true)]
    region: Option<String>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite short-form tags (`!Ref`, `!Sub`, ...) into canonical keys
    Convert {
        /// Input files (can be multiple files or glob patterns like "templates/**/*.yaml")
        #[arg(required = true)]
        files: Vec<String>,

        /// Edit files in place
        #[arg(short, long, conflicts_with = "output")]
        in_place: bool,

        /// Check mode: show what would be changed without modifying files
        #[arg(short, long)]
        check: bool,

        /// Write the converted template to FILE (single input only)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Report tags still written in short form
    Check {
        /// Input files (can be multiple files or glob patterns like "templates/**/*.yaml")
        #[arg(required = true)]
        files: Vec<String>,

        /// Output results as JSONL
        #[arg(long)]
        json: bool,

        /// Save detailed results to file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Validate a template against a resource specification
    Validate {
        /// Template file (.json, .yaml or .yml)
        template: PathBuf,

        /// Resource specification JSON file
        #[arg(long, value_name = "FILE")]
        specification: Option<PathBuf>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Validate and estimate costs through the API instead
        #[arg(long, conflicts_with = "specification")]
        online: bool,
    },

    /// Update an existing stack with a template
    UpdateStack {
        /// Template file
        template: PathBuf,

        /// Name of the stack to update
        #[arg(long)]
        stack_name: String,

        /// Capability to acknowledge, e.g. CAPABILITY_IAM (repeatable)
        #[arg(long = "capability", value_name = "CAPABILITY")]
        capabilities: Vec<String>,

        /// Stack parameter as KEY=VALUE (repeatable)
        #[arg(long = "parameter", value_name = "KEY=VALUE")]
        parameters: Vec<String>,
    },

    /// List the known intrinsic function tags
    ListTags,
}

fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    ["cftool", "cftool_intrinsics", "cftool_template"]
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Convert {
            files,
            in_place,
            check,
            output,
        } => convert::execute(&ConvertArgs {
            files,
            in_place,
            check,
            output,
        }),
        Commands::Check {
            files,
            json,
            output,
        } => check::execute(&CheckArgs {
            files,
            json,
            output,
        }),
        Commands::Validate {
            template,
            specification,
            json,
            online,
        } => {
            let mut config = Config::load(cli.config.as_deref())?;
            config.apply(ConfigOverrides {
                profile: cli.profile,
                region: cli.region,
                specification,
            });
            validate::execute(
                &ValidateArgs {
                    template,
                    json,
                    online,
                },
                &config,
            )
        }
        Commands::UpdateStack {
            template,
            stack_name,
            capabilities,
            parameters,
        } => {
            let mut config = Config::load(cli.config.as_deref())?;
            config.apply(ConfigOverrides {
                profile: cli.profile,
                region: cli.region,
                specification: None,
            });
            update_stack::execute(
                &UpdateStackArgs {
                    template,
                    stack_name,
                    capabilities,
                    parameters,
                },
                &config,
            )
        }
        Commands::ListTags => {
            list_tags::execute();
            Ok(true)
        }
    }
}

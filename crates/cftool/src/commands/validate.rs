//! `cftool validate`: offline validation against a resource specification,
//! or with `--online`, validation and cost estimation through the API.

use anyhow::{Context, Result, anyhow};
use cftool_template::{Specification, Template, ValidationReport, validate_template};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::remote::{CloudFormationService, OnlineReport, RemoteValidation, validate_online};
use crate::utils::file_io::read_file;

#[derive(Debug, Clone)]
pub struct ValidateArgs {
    pub template: PathBuf,
    pub json: bool,
    /// Ask the service instead of the local specification
    pub online: bool,
}

pub fn validate_file(template_path: &Path, specification_path: &Path) -> Result<ValidationReport> {
    let specification = Specification::from_file(specification_path).with_context(|| {
        format!(
            "Failed to load resource specification: {}",
            specification_path.display()
        )
    })?;
    let template = Template::from_file(template_path)
        .with_context(|| format!("Failed to load template: {}", template_path.display()))?;

    Ok(validate_template(&template, &specification))
}

/// Returns `true` when the template is valid.
pub fn execute(args: &ValidateArgs, config: &Config) -> Result<bool> {
    if args.online {
        return execute_online(args, config);
    }
    tracing::info!(region = %config.region, "Using configuration");

    let specification_path = config.specification_path().ok_or_else(|| {
        anyhow!(
            "No resource specification configured; pass --specification or set \
             `specification` or `specification_dir` in main.yaml"
        )
    })?;
    tracing::info!(template = %args.template.display(), specification = %specification_path.display(), "Validating");

    let report = validate_file(&args.template, &specification_path)?;

    if args.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        for finding in &report.findings {
            println!("  {} {}", "✗".red(), finding);
        }
        if report.is_valid() {
            println!("{}", "Template is valid!".green());
        } else {
            println!("{}", "Template is invalid!".red());
        }
    }

    Ok(report.is_valid())
}

fn execute_online(args: &ValidateArgs, config: &Config) -> Result<bool> {
    let template_body = read_file(&args.template)?;
    tracing::info!(template = %args.template.display(), "Validating online");

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(async {
        let service = CloudFormationService::connect(config).await;
        validate_online(&service, &template_body).await
    })?;

    print_online_report(&report, args.json)?;
    Ok(report.validation.is_valid())
}

pub fn print_online_report(report: &OnlineReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }

    match &report.validation {
        RemoteValidation::Valid {
            description,
            parameters,
            capabilities,
        } => {
            if let Some(description) = description {
                println!("Description: {}", description);
            }
            if !parameters.is_empty() {
                println!("Parameters: {}", parameters.join(", "));
            }
            if !capabilities.is_empty() {
                println!("Capabilities: {}", capabilities.join(", ").yellow());
            }
            if let Some(url) = &report.cost_estimate_url {
                println!("Costs estimation: {}", url.cyan());
            }
            println!("{}", "Template is valid!".green());
        }
        RemoteValidation::Invalid { message } => {
            println!("  {} {}", "✗".red(), message);
            println!("{}", "Template is invalid!".red());
        }
    }
    Ok(())
}

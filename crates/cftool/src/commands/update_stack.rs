//! `cftool update-stack`: push a template to an existing stack.

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::config::Config;
use crate::remote::{CloudFormationService, StackUpdate, TemplateService, parse_parameter};
use crate::utils::file_io::read_file;

#[derive(Debug, Clone, Default)]
pub struct UpdateStackArgs {
    pub template: PathBuf,
    pub stack_name: String,
    pub capabilities: Vec<String>,
    /// Raw `KEY=VALUE` pairs
    pub parameters: Vec<String>,
}

pub fn build_update(args: &UpdateStackArgs) -> Result<StackUpdate> {
    let parameters = args
        .parameters
        .iter()
        .map(|raw| parse_parameter(raw))
        .collect::<Result<Vec<_>>>()?;

    Ok(StackUpdate {
        stack_name: args.stack_name.clone(),
        template_body: read_file(&args.template)?,
        capabilities: args.capabilities.clone(),
        parameters,
    })
}

pub async fn send_update(service: &dyn TemplateService, update: &StackUpdate) -> Result<Option<String>> {
    tracing::info!(
        stack = %update.stack_name,
        parameters = update.parameters.len(),
        capabilities = ?update.capabilities,
        "Updating stack"
    );
    service.update_stack(update).await
}

pub fn execute(args: &UpdateStackArgs, config: &Config) -> Result<bool> {
    let update = build_update(args)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let stack_id = runtime.block_on(async {
        let service = CloudFormationService::connect(config).await;
        send_update(&service, &update).await
    })?;

    println!(
        "{} {}",
        "Update started:".green(),
        stack_id.as_deref().unwrap_or(&update.stack_name)
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::FakeService;
    use std::fs;
    use tempfile::TempDir;

    fn args_for(dir: &TempDir) -> UpdateStackArgs {
        let template = dir.path().join("stack.yaml");
        fs::write(&template, "Resources: {}\n").unwrap();
        UpdateStackArgs {
            template,
            stack_name: "queues".into(),
            capabilities: vec!["CAPABILITY_IAM".into()],
            parameters: vec!["Env=prod".into()],
        }
    }

    #[test]
    fn test_build_update_reads_template_and_parameters() {
        let dir = TempDir::new().unwrap();
        let update = build_update(&args_for(&dir)).unwrap();
        assert_eq!(update.template_body, "Resources: {}\n");
        assert_eq!(update.parameters, vec![("Env".to_string(), "prod".to_string())]);
        assert_eq!(update.capabilities, vec!["CAPABILITY_IAM".to_string()]);
    }

    #[test]
    fn test_bad_parameter_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut args = args_for(&dir);
        args.parameters.push("missing-equals".into());
        let err = build_update(&args).unwrap_err();
        assert!(err.to_string().contains("missing-equals"));
    }

    #[tokio::test]
    async fn test_send_update_reaches_service() {
        let dir = TempDir::new().unwrap();
        let update = build_update(&args_for(&dir)).unwrap();
        let service = FakeService::accepting();

        let stack_id = send_update(&service, &update).await.unwrap();
        assert_eq!(stack_id.as_deref(), Some("arn:stack/queues"));
        assert_eq!(*service.updates.lock().unwrap(), vec![update]);
    }
}

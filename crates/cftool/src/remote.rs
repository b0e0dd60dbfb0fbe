//! Template operations that go through the CloudFormation API.
//!
//! [`TemplateService`] is the seam: commands talk to it, the real
//! implementation is [`CloudFormationService`], and tests substitute their
//! own.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::config::Region;
use aws_sdk_cloudformation::error::ProvideErrorMetadata;
use aws_sdk_cloudformation::types::{Capability, Parameter};
use serde::Serialize;

use crate::config::Config;

/// What the service said about a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RemoteValidation {
    Valid {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Parameter keys the template declares
        parameters: Vec<String>,
        /// Capabilities a stack using the template must acknowledge
        capabilities: Vec<String>,
    },
    Invalid {
        message: String,
    },
}

impl RemoteValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, RemoteValidation::Valid { .. })
    }
}

/// Outcome of `cftool validate --online`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnlineReport {
    pub validation: RemoteValidation,
    /// Calculator link for the template's monthly cost
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_estimate_url: Option<String>,
}

/// A stack update request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackUpdate {
    pub stack_name: String,
    pub template_body: String,
    pub capabilities: Vec<String>,
    /// `(key, value)` pairs
    pub parameters: Vec<(String, String)>,
}

#[async_trait]
pub trait TemplateService: Send + Sync {
    /// A rejected template is `Ok(Invalid)`; `Err` means the call itself failed.
    async fn validate(&self, template_body: &str) -> Result<RemoteValidation>;

    async fn estimate_cost(&self, template_body: &str) -> Result<Option<String>>;

    /// Returns the stack id.
    async fn update_stack(&self, update: &StackUpdate) -> Result<Option<String>>;
}

pub struct CloudFormationService {
    client: Client,
}

impl CloudFormationService {
    /// Build a client for the configured profile and region.
    pub async fn connect(config: &Config) -> Self {
        tracing::info!(profile = %config.profile, region = %config.region, "Connecting");
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(config.profile.as_str())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl TemplateService for CloudFormationService {
    async fn validate(&self, template_body: &str) -> Result<RemoteValidation> {
        let result = self
            .client
            .validate_template()
            .template_body(template_body)
            .send()
            .await;

        match result {
            Ok(output) => Ok(RemoteValidation::Valid {
                description: output.description().map(str::to_string),
                parameters: output
                    .parameters()
                    .iter()
                    .filter_map(|parameter| parameter.parameter_key().map(str::to_string))
                    .collect(),
                capabilities: output
                    .capabilities()
                    .iter()
                    .map(|capability| capability.as_str().to_string())
                    .collect(),
            }),
            Err(err) => match err.as_service_error() {
                Some(service_error) => Ok(RemoteValidation::Invalid {
                    message: service_error
                        .message()
                        .unwrap_or("Template rejected")
                        .to_string(),
                }),
                None => Err(err).context("ValidateTemplate request failed"),
            },
        }
    }

    async fn estimate_cost(&self, template_body: &str) -> Result<Option<String>> {
        let output = self
            .client
            .estimate_template_cost()
            .template_body(template_body)
            .send()
            .await
            .context("EstimateTemplateCost request failed")?;
        Ok(output.url().map(str::to_string))
    }

    async fn update_stack(&self, update: &StackUpdate) -> Result<Option<String>> {
        let mut request = self
            .client
            .update_stack()
            .stack_name(update.stack_name.as_str())
            .template_body(update.template_body.as_str());
        for capability in &update.capabilities {
            request = request.capabilities(Capability::from(capability.as_str()));
        }
        for (key, value) in &update.parameters {
            request = request.parameters(
                Parameter::builder()
                    .parameter_key(key.as_str())
                    .parameter_value(value.as_str())
                    .build(),
            );
        }

        let output = request
            .send()
            .await
            .with_context(|| format!("UpdateStack request failed for {}", update.stack_name))?;
        Ok(output.stack_id().map(str::to_string))
    }
}

/// Validate remotely, then ask for a cost estimate when the template is
/// accepted. A failed estimate only warns.
pub async fn validate_online(service: &dyn TemplateService, template_body: &str) -> Result<OnlineReport> {
    let validation = service.validate(template_body).await?;

    let cost_estimate_url = if validation.is_valid() {
        match service.estimate_cost(template_body).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cost estimation failed: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    Ok(OnlineReport {
        validation,
        cost_estimate_url,
    })
}

/// Parse a `KEY=VALUE` stack parameter.
pub fn parse_parameter(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid parameter '{}' (expected KEY=VALUE)", raw))?;
    if key.trim().is_empty() {
        anyhow::bail!("Invalid parameter '{}': empty key", raw);
    }
    Ok((key.trim().to_string(), value.to_string()))
}


#[cfg(test)]
mod tests {
    use super::fake::FakeService;
    use super::*;

    #[tokio::test]
    async fn test_valid_template_gets_cost_estimate() {
        let service = FakeService::accepting();
        let report = validate_online(&service, "Resources: {}").await.unwrap();
        assert!(report.validation.is_valid());
        assert_eq!(
            report.cost_estimate_url.as_deref(),
            Some("https://calculator.example/estimate")
        );
    }

    #[tokio::test]
    async fn test_invalid_template_skips_cost_estimate() {
        let service = FakeService::rejecting("Template format error");
        let report = validate_online(&service, "Resources: [").await.unwrap();
        assert_eq!(
            report.validation,
            RemoteValidation::Invalid {
                message: "Template format error".into()
            }
        );
        assert_eq!(report.cost_estimate_url, None);
        assert_eq!(*service.estimate_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_estimate_is_not_fatal() {
        let mut service = FakeService::accepting();
        service.cost_url = Err("throttled".into());
        let report = validate_online(&service, "Resources: {}").await.unwrap();
        assert!(report.validation.is_valid());
        assert_eq!(report.cost_estimate_url, None);
    }

    #[test]
    fn test_parse_parameter() {
        assert_eq!(
            parse_parameter("Env=prod=blue").unwrap(),
            ("Env".to_string(), "prod=blue".to_string())
        );
        assert!(parse_parameter("Env").is_err());
        assert!(parse_parameter("=x").is_err());
    }

    #[test]
    fn test_report_serializes_status() {
        let report = OnlineReport {
            validation: RemoteValidation::Invalid {
                message: "bad".into(),
            },
            cost_estimate_url: None,
        };
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"validation":{"status":"invalid","message":"bad"}}"#
        );
    }
}

//! Offline template validation against a resource specification.
//!
//! Checks, per resource, that its type is known and that every property the
//! specification marks required is present. Values are not inspected.

use serde::Serialize;
use std::fmt;

use crate::specification::Specification;
use crate::template::{Resource, Template};

/// One problem found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Finding {
    /// Resource has no `Type`, or one the specification does not know
    UnknownType {
        resource: String,
        resource_type: Option<String>,
    },

    /// Required property absent from `Properties`
    MissingRequiredProperty { resource: String, property: String },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::UnknownType {
                resource,
                resource_type: None,
            } => write!(f, "Type needs to be specified for resource {}", resource),
            Finding::UnknownType {
                resource,
                resource_type: Some(resource_type),
            } => write!(
                f,
                "Unknown type '{}' for resource {}",
                resource_type, resource
            ),
            Finding::MissingRequiredProperty { resource, property } => write!(
                f,
                "Property {} is required for resource {}",
                property, resource
            ),
        }
    }
}

/// Outcome of validating one template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub resources_checked: usize,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Validate every resource of `template`.
///
/// Findings come out ordered by resource name, then property name.
pub fn validate_template(template: &Template, specification: &Specification) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (name, resource) in &template.resources {
        report.resources_checked += 1;
        validate_resource(name, resource, specification, &mut report.findings);
    }

    for finding in &report.findings {
        tracing::debug!(%finding, "validation finding");
    }
    report
}

fn validate_resource(
    name: &str,
    resource: &Resource,
    specification: &Specification,
    findings: &mut Vec<Finding>,
) {
    let Some(resource_spec) = resource
        .resource_type
        .as_deref()
        .and_then(|resource_type| specification.resource_type(resource_type))
    else {
        findings.push(Finding::UnknownType {
            resource: name.to_string(),
            resource_type: resource.resource_type.clone(),
        });
        return;
    };

    for property in resource_spec.required_properties() {
        if !resource.has_property(property) {
            findings.push(Finding::MissingRequiredProperty {
                resource: name.to_string(),
                property: property.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateFormat;

    fn specification() -> Specification {
        Specification::from_json(
            r#"{"ResourceTypes": {
                "AWS::SNS::Subscription": {"Properties": {
                    "TopicArn": {"Required": true},
                    "Protocol": {"Required": true},
                    "Endpoint": {"Required": false}
                }},
                "AWS::SNS::Topic": {"Properties": {"TopicName": {"Required": false}}}
            }}"#,
        )
        .unwrap()
    }

    fn validate_yaml(content: &str) -> ValidationReport {
        let template = Template::parse(content, TemplateFormat::Yaml).unwrap();
        validate_template(&template, &specification())
    }

    #[test]
    fn test_valid_template() {
        let report = validate_yaml(
            r#"
Resources:
  Topic:
    Type: AWS::SNS::Topic
  Subscription:
    Type: AWS::SNS::Subscription
    Properties:
      TopicArn: !Ref Topic
      Protocol: email
"#,
        );
        assert!(report.is_valid(), "Unexpected findings: {:?}", report.findings);
        assert_eq!(report.resources_checked, 2);
    }

    #[test]
    fn test_missing_required_properties() {
        let report = validate_yaml(
            r#"
Resources:
  Subscription:
    Type: AWS::SNS::Subscription
    Properties:
      Endpoint: ops@example.com
"#,
        );
        assert_eq!(
            report.findings,
            vec![
                Finding::MissingRequiredProperty {
                    resource: "Subscription".into(),
                    property: "Protocol".into(),
                },
                Finding::MissingRequiredProperty {
                    resource: "Subscription".into(),
                    property: "TopicArn".into(),
                },
            ]
        );
        assert_eq!(
            report.findings[0].to_string(),
            "Property Protocol is required for resource Subscription"
        );
    }

    #[test]
    fn test_missing_and_unknown_types() {
        let report = validate_yaml(
            r#"
Resources:
  Anonymous:
    Properties: {}
  Strange:
    Type: AWS::Nope::Thing
"#,
        );
        assert_eq!(report.findings.len(), 2);
        assert_eq!(
            report.findings[0].to_string(),
            "Type needs to be specified for resource Anonymous"
        );
        assert_eq!(
            report.findings[1].to_string(),
            "Unknown type 'AWS::Nope::Thing' for resource Strange"
        );
    }

    #[test]
    fn test_findings_serialize_with_type_tag() {
        let finding = Finding::MissingRequiredProperty {
            resource: "A".into(),
            property: "B".into(),
        };
        let json = serde_json::to_string(&finding).unwrap();
        assert_eq!(
            json,
            r#"{"type":"MissingRequiredProperty","data":{"resource":"A","property":"B"}}"#
        );
    }
}

//! Template model and decoding.
//!
//! Both formats decode into the same [`Template`]. Section values are kept as
//! [`serde_yaml::Value`], which preserves short-form tags (`!Ref X` becomes a
//! tagged value) so a YAML template decodes whether or not its tags were
//! rewritten.

use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Serialization format of a template file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Json,
    Yaml,
}

impl TemplateFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        match extension {
            "json" => Ok(TemplateFormat::Json),
            "yaml" | "yml" => Ok(TemplateFormat::Yaml),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A deployment template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion", default)]
    pub format_version: Option<String>,

    #[serde(rename = "Description", default)]
    pub description: Option<String>,

    #[serde(rename = "Metadata", default)]
    pub metadata: Option<Value>,

    #[serde(rename = "Parameters", default)]
    pub parameters: Option<BTreeMap<String, Value>>,

    #[serde(rename = "Mappings", default)]
    pub mappings: Option<BTreeMap<String, Value>>,

    #[serde(rename = "Conditions", default)]
    pub conditions: Option<BTreeMap<String, Value>>,

    #[serde(rename = "Transform", default)]
    pub transform: Option<Value>,

    #[serde(rename = "Resources", default)]
    pub resources: BTreeMap<String, Resource>,

    #[serde(rename = "Outputs", default)]
    pub outputs: Option<BTreeMap<String, Value>>,
}

/// One entry of the `Resources` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resource {
    #[serde(rename = "Type", default)]
    pub resource_type: Option<String>,

    #[serde(rename = "Properties", default)]
    pub properties: Option<BTreeMap<String, Value>>,
}

impl Resource {
    /// Whether `name` is set, even to null.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties
            .as_ref()
            .is_some_and(|properties| properties.contains_key(name))
    }
}

impl Template {
    /// Decode template text in the given format.
    pub fn parse(content: &str, format: TemplateFormat) -> Result<Self> {
        let template: Template = match format {
            TemplateFormat::Json => serde_json::from_str(content)?,
            TemplateFormat::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(template)
    }

    /// Read and decode a template, picking the format from its extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = TemplateFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        tracing::debug!(path = %path.display(), ?format, "Decoding template");
        Self::parse(&content, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            TemplateFormat::from_path(Path::new("stack.json")).unwrap(),
            TemplateFormat::Json
        );
        assert_eq!(
            TemplateFormat::from_path(Path::new("stack.yml")).unwrap(),
            TemplateFormat::Yaml
        );
        assert_eq!(
            TemplateFormat::from_path(Path::new("dir/stack.yaml")).unwrap(),
            TemplateFormat::Yaml
        );
        assert!(matches!(
            TemplateFormat::from_path(Path::new("stack.txt")),
            Err(Error::UnsupportedFormat(ext)) if ext == "txt"
        ));
        assert!(TemplateFormat::from_path(Path::new("stack")).is_err());
    }

    #[test]
    fn test_parse_yaml_with_short_form_tags() {
        let content = r#"
Resources:
  Bucket:
    Type: AWS::S3::Bucket
    Properties:
      BucketName: !Sub ${AWS::StackName}-logs
  Queue:
    Type: AWS::SQS::Queue
"#;
        let template = Template::parse(content, TemplateFormat::Yaml).unwrap();
        assert_eq!(template.resources.len(), 2);

        let bucket = &template.resources["Bucket"];
        assert_eq!(bucket.resource_type.as_deref(), Some("AWS::S3::Bucket"));
        assert!(bucket.has_property("BucketName"));
        assert!(!template.resources["Queue"].has_property("BucketName"));
    }

    #[test]
    fn test_parse_json() {
        let content = r#"{
  "AWSTemplateFormatVersion": "2010-09-09",
  "Description": "queue",
  "Resources": {
    "Queue": { "Type": "AWS::SQS::Queue", "Properties": { "DelaySeconds": 5 } }
  }
}"#;
        let template = Template::parse(content, TemplateFormat::Json).unwrap();
        assert_eq!(template.format_version.as_deref(), Some("2010-09-09"));
        assert_eq!(template.description.as_deref(), Some("queue"));
        assert!(template.resources["Queue"].has_property("DelaySeconds"));
    }

    #[test]
    fn test_empty_properties_decode_as_none() {
        let content = "Resources:\n  Topic:\n    Type: AWS::SNS::Topic\n    Properties:\n";
        let template = Template::parse(content, TemplateFormat::Yaml).unwrap();
        assert!(template.resources["Topic"].properties.is_none());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = Template::parse("{ not json", TemplateFormat::Json).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}

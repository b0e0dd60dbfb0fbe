//! Resource specification: which properties each resource type requires.
//!
//! Decoded from the provider's resource specification JSON. Only the parts
//! the offline validator reads are modelled; everything else is ignored.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Specification {
    #[serde(rename = "ResourceSpecificationVersion", default)]
    pub version: Option<String>,

    #[serde(rename = "ResourceTypes", default)]
    pub resource_types: BTreeMap<String, ResourceSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceSpec {
    #[serde(rename = "Documentation", default)]
    pub documentation: Option<String>,

    #[serde(rename = "Properties", default)]
    pub properties: BTreeMap<String, PropertySpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertySpec {
    #[serde(rename = "Documentation", default)]
    pub documentation: Option<String>,

    #[serde(rename = "Required", default)]
    pub required: bool,
}

impl ResourceSpec {
    /// Names of required properties, sorted.
    pub fn required_properties(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name.as_str())
    }
}

impl Specification {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let specification = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            resource_types = specification.resource_types.len(),
            "Loaded resource specification"
        );
        Ok(specification)
    }

    pub fn resource_type(&self, name: &str) -> Option<&ResourceSpec> {
        self.resource_types.get(name)
    }
}

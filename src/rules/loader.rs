//! Rule set loader - YAML file loading and compilation

use super::types::RuleSetDefinition;
use super::RuleSet;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Loads rule sets from YAML files
pub struct RuleLoader;

impl RuleLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load and compile a rule set from a YAML file
    pub fn load_rules<P: AsRef<Path>>(&self, path: P) -> Result<RuleSet> {
        let path = path.as_ref();
        log::debug!("loading rules from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse and compile a rule set from a YAML string
    pub fn parse_yaml(content: &str) -> Result<RuleSet> {
        let def: RuleSetDefinition = serde_yaml::from_str(content)?;
        RuleSet::compile(def)
    }
}

impl Default for RuleLoader {
    fn default() -> Self {
        Self::new()
    }
}

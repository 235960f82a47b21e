// SPDX-License-Identifier: MIT

//! YAML schema types for rule set files

use serde::{Deserialize, Serialize};

/// Top-level rule set definition
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RuleSetDefinition {
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// A single named rule
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RuleDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Filter query the rule stands for
    pub when: String,
}

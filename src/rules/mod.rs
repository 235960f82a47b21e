// SPDX-License-Identifier: MIT

//! Named rule sets
//!
//! This module provides:
//! - `RuleSetDefinition` - the YAML shape of a rule file
//! - `RuleLoader` - loads and compiles rule files
//! - `RuleSet` - compiled rules matched against conditions or records

mod loader;
mod types;

pub use loader::RuleLoader;
pub use types::{RuleDefinition, RuleSetDefinition};

use crate::condition::{parse, Condition};
use crate::error::{FilterError, Result};
use crate::record::Record;
use std::collections::HashSet;

/// A rule with its compiled condition
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub description: String,
    pub condition: Condition,
}

/// Compiled rules, in file order
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile every rule's query, rejecting empty and duplicate names
    pub fn compile(def: RuleSetDefinition) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(def.rules.len());

        for rule in def.rules {
            if rule.name.is_empty() {
                return Err(FilterError::config("rule name can't be empty"));
            }
            if !seen.insert(rule.name.clone()) {
                return Err(FilterError::config(format!(
                    "duplicate rule name '{}'",
                    rule.name
                )));
            }

            let condition = parse(&rule.when);
            if condition == Condition::empty() {
                log::warn!(
                    "rule '{}' has no usable condition and will never match: {:?}",
                    rule.name,
                    rule.when
                );
            }
            rules.push(Rule {
                name: rule.name,
                description: rule.description,
                condition,
            });
        }

        Ok(Self { rules })
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules satisfied by `candidate`, each rule acting as the reference
    pub fn matching_rules(&self, candidate: &Condition) -> Result<Vec<&Rule>> {
        let mut matched = Vec::new();
        for rule in &self.rules {
            if rule.condition.matches_condition(candidate)? {
                matched.push(rule);
            }
        }
        log::debug!(
            "candidate {} matched {}/{} rule(s)",
            candidate,
            matched.len(),
            self.rules.len()
        );
        Ok(matched)
    }

    /// Rules whose condition holds for `record`
    pub fn matching_record(&self, record: &dyn Record) -> Result<Vec<&Rule>> {
        let mut matched = Vec::new();
        for rule in &self.rules {
            if rule.condition.matches(record)? {
                matched.push(rule);
            }
        }
        Ok(matched)
    }
}

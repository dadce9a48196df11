//! Rhetoric Policy Engine - renders one production plan per output target.
//!
//! Targets are normalized to lookup keys and mapped to a [`RhetoricPolicy`].
//! Unknown targets fall back to [`RhetoricPolicy::Default`]; rendering never
//! fails. Every render is a pure function of the plan, so targets can be
//! rendered independently.

mod policies;

pub use policies::*;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::RhetoricConfig;
use crate::documents::ProductionPlan;

/// Text rendered for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub target: String,
    pub policy: RhetoricPolicy,
    pub text: String,
}

/// Target-keyed policy table, built once at startup.
#[derive(Debug, Clone)]
pub struct RhetoricEngine {
    policies: HashMap<String, RhetoricPolicy>,
    config: RhetoricConfig,
}

impl RhetoricEngine {
    /// Create an engine with no specialized targets.
    pub fn new(config: RhetoricConfig) -> Self {
        Self {
            policies: HashMap::new(),
            config,
        }
    }

    /// Create an engine with every built-in target registered.
    pub fn with_builtins(config: RhetoricConfig) -> Self {
        Self::new(config)
            .with_target("dall_e_3", RhetoricPolicy::NarrativeParagraph)
            .with_target("midjourney_v6", RhetoricPolicy::PoeticFragment)
            .with_target("stable_diffusion_3", RhetoricPolicy::NumberedRecipe)
            .with_target("seedream_4_0", RhetoricPolicy::LetteredModules)
            .with_target("nano_banana", RhetoricPolicy::KeyValueSheet)
            .with_target("flux_1", RhetoricPolicy::ObjectiveBrief)
    }

    pub fn with_target(mut self, target: &str, policy: RhetoricPolicy) -> Self {
        self.register(target, policy);
        self
    }

    pub fn register(&mut self, target: &str, policy: RhetoricPolicy) -> Option<RhetoricPolicy> {
        self.policies.insert(normalize_target(target), policy)
    }

    /// Policy used for `target`, falling back to the default.
    pub fn policy_for(&self, target: &str) -> RhetoricPolicy {
        self.policies
            .get(&normalize_target(target))
            .copied()
            .unwrap_or(RhetoricPolicy::Default)
    }

    pub fn render(&self, plan: &ProductionPlan, target: &str) -> String {
        self.render_prompt(plan, target).text
    }

    pub fn render_prompt(&self, plan: &ProductionPlan, target: &str) -> RenderedPrompt {
        let policy = self.policy_for(target);
        let text = normalize_output(&policy.compose(plan, &self.config));
        debug!(model = target, %policy, chars = text.len(), "prompt rendered");
        RenderedPrompt {
            target: target.to_string(),
            policy,
            text,
        }
    }

    /// Render every target in order. Targets with the same normalized key are
    /// rendered once, under the spelling that appeared first.
    pub fn render_all<S: AsRef<str>>(&self, plan: &ProductionPlan, targets: &[S]) -> Vec<RenderedPrompt> {
        let mut seen = HashSet::with_capacity(targets.len());
        let mut rendered = Vec::with_capacity(targets.len());
        for target in targets {
            let target = target.as_ref();
            if seen.insert(normalize_target(target)) {
                rendered.push(self.render_prompt(plan, target));
            }
        }
        rendered
    }
}

impl Default for RhetoricEngine {
    fn default() -> Self {
        Self::with_builtins(RhetoricConfig::default())
    }
}

/// Lookup key for a target: lower-case, with `-`, space and `.` as `_`.
pub fn normalize_target(target: &str) -> String {
    target.trim().to_lowercase().replace(['-', ' ', '.'], "_")
}

/// Replace underscores with spaces, collapse runs of whitespace within each
/// line and drop blank lines. Line breaks survive.
pub fn normalize_output(text: &str) -> String {
    text.replace('_', " ")
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activation resolution.
//!
//! Computes the final enabled/disabled decision set from catalog defaults,
//! environment overrides, and caller overrides, then expands dependencies to
//! a fixed point. Pure function of its three inputs; any configuration error
//! is surfaced here, before a single hook is registered.

use std::collections::BTreeMap;

use graft_core::{ActivationDecision, DecisionSource, GraftError, PatchIndicator};

use crate::catalog::IntegrationCatalog;

/// Prefix of per-integration environment override variables.
pub const ENV_PREFIX: &str = "GRAFT_";

/// Suffix of per-integration environment override variables.
pub const ENV_SUFFIX: &str = "_ENABLED";

/// Derive the environment override key for an integration name.
///
/// The name is uppercased and any non-alphanumeric character becomes an
/// underscore, e.g. `dogpile.cache` -> `GRAFT_DOGPILE_CACHE_ENABLED`.
pub fn env_key(name: &str) -> String {
    let normalized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{ENV_PREFIX}{normalized}{ENV_SUFFIX}")
}

/// Parse a boolean override from the fixed vocabulary.
///
/// Accepts `1/true/yes/on/enabled` and `0/false/no/off/disabled`,
/// case-insensitive. Anything else is a configuration error.
pub fn parse_bool(value: &str) -> Result<bool, GraftError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enabled" => Ok(true),
        "0" | "false" | "no" | "off" | "disabled" => Ok(false),
        other => Err(GraftError::Config(format!(
            "invalid boolean value `{other}` (expected 1/0, true/false, yes/no, on/off, enabled/disabled)"
        ))),
    }
}

/// Collect the derived override variables for this catalog from the process
/// environment. Unrelated variables are ignored.
pub fn process_env_overrides(catalog: &IntegrationCatalog) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    for name in catalog.all_names() {
        let key = env_key(&name);
        if let Ok(value) = std::env::var(&key) {
            env.insert(key, value);
        }
    }
    env
}

/// Resolve the final decision set.
///
/// Precedence: caller overrides > environment overrides > catalog defaults.
/// Dependency expansion runs last and force-enables dependencies of enabled
/// integrations regardless of any override. Caller overrides may name
/// integrations the catalog does not know; those decisions are carried
/// through and rejected or skipped at patch time.
pub fn resolve(
    catalog: &IntegrationCatalog,
    env: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, PatchIndicator>,
) -> Result<Vec<ActivationDecision>, GraftError> {
    let mut decisions: BTreeMap<String, (bool, DecisionSource)> = BTreeMap::new();

    for name in catalog.all_names() {
        let spec = catalog
            .lookup(&name)
            .ok_or_else(|| GraftError::Internal(format!("catalog lost entry `{name}`")))?;
        decisions.insert(name.clone(), (spec.default_enabled, DecisionSource::Default));
    }

    for (name, state) in decisions.iter_mut() {
        let key = env_key(name);
        if let Some(raw) = env.get(&key) {
            let enabled = parse_bool(raw).map_err(|_| {
                GraftError::Config(format!(
                    "invalid value `{raw}` for environment override {key}"
                ))
            })?;
            *state = (enabled, DecisionSource::EnvOverride);
        }
    }

    for (name, indicator) in overrides {
        decisions.insert(
            name.clone(),
            (indicator.is_enabled(), DecisionSource::CallerOverride),
        );
    }

    // Expand dependencies to a fixed point. Cycles cannot occur: the catalog
    // rejected them at construction time.
    loop {
        let mut forced: Vec<String> = Vec::new();
        for (name, (enabled, _)) in &decisions {
            if !enabled {
                continue;
            }
            let Some(spec) = catalog.lookup(name) else {
                continue;
            };
            for dep in &spec.depends_on {
                let dep_enabled = decisions.get(dep).is_some_and(|(e, _)| *e);
                if !dep_enabled && !forced.contains(dep) {
                    forced.push(dep.clone());
                }
            }
        }
        if forced.is_empty() {
            break;
        }
        for dep in forced {
            decisions.insert(dep, (true, DecisionSource::DependencyInduced));
        }
    }

    Ok(decisions
        .into_iter()
        .map(|(name, (enabled, source))| ActivationDecision {
            name,
            enabled,
            source,
        })
        .collect())
}

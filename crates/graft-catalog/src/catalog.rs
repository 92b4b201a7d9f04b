// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated, read-only integration catalog.
//!
//! The catalog is built once at process start from compiled-in defaults (or
//! caller-supplied specs) and never mutated afterwards. Validation rejects
//! duplicate names, dependencies on unknown integrations, and dependency
//! cycles at construction time so the resolver never has to deal with them.

use std::collections::HashMap;

use graft_core::GraftError;

use crate::spec::IntegrationSpec;

/// Options that influence the compiled-in catalog defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogOptions {
    /// Enable the log-pipeline integrations (logging, loguru, structlog) by
    /// default. Mirrors the logs-injection switch of the host configuration.
    pub logs_injection: bool,
}

/// Read-only table of integration specifications keyed by name.
#[derive(Debug, Clone)]
pub struct IntegrationCatalog {
    entries: HashMap<String, IntegrationSpec>,
}

impl IntegrationCatalog {
    /// Build a catalog from the given specs, validating the whole set.
    pub fn new<I>(specs: I) -> Result<Self, GraftError>
    where
        I: IntoIterator<Item = IntegrationSpec>,
    {
        let mut entries = HashMap::new();
        for spec in specs {
            if spec.name.trim().is_empty() {
                return Err(GraftError::Config(
                    "integration name must not be empty".to_string(),
                ));
            }
            if entries.insert(spec.name.clone(), spec.clone()).is_some() {
                return Err(GraftError::Config(format!(
                    "duplicate integration name `{}` in catalog",
                    spec.name
                )));
            }
        }

        for spec in entries.values() {
            for dep in &spec.depends_on {
                if !entries.contains_key(dep) {
                    return Err(GraftError::Config(format!(
                        "integration `{}` depends on unknown integration `{dep}`",
                        spec.name
                    )));
                }
            }
        }

        detect_cycles(&entries)?;

        Ok(Self { entries })
    }

    /// The compiled-in default catalog.
    pub fn builtin(options: &CatalogOptions) -> Result<Self, GraftError> {
        Self::new(builtin_specs(options))
    }

    /// Look up an integration by name.
    pub fn lookup(&self, name: &str) -> Option<&IntegrationSpec> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All integration names, sorted.
    pub fn all_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Target modules for an integration, if it exists.
    pub fn modules_for(&self, name: &str) -> Option<Vec<String>> {
        self.entries.get(name).map(IntegrationSpec::target_modules)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reject dependency cycles with a depth-first walk over the catalog.
fn detect_cycles(entries: &HashMap<String, IntegrationSpec>) -> Result<(), GraftError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        InProgress,
        Done,
    }

    fn visit(
        name: &str,
        entries: &HashMap<String, IntegrationSpec>,
        marks: &mut HashMap<String, Mark>,
        path: &mut Vec<String>,
    ) -> Result<(), GraftError> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => {
                let start = path.iter().position(|n| n == name).unwrap_or(0);
                let mut chain: Vec<&str> = path[start..].iter().map(String::as_str).collect();
                chain.push(name);
                return Err(GraftError::DependencyCycle {
                    chain: chain.join(" -> "),
                });
            }
            None => {}
        }
        marks.insert(name.to_string(), Mark::InProgress);
        path.push(name.to_string());
        if let Some(spec) = entries.get(name) {
            for dep in &spec.depends_on {
                visit(dep, entries, marks, path)?;
            }
        }
        path.pop();
        marks.insert(name.to_string(), Mark::Done);
        Ok(())
    }

    let mut marks = HashMap::new();
    let mut path = Vec::new();
    for name in entries.keys() {
        visit(name, entries, &mut marks, &mut path)?;
    }
    Ok(())
}

/// Compiled-in integration defaults.
///
/// Module fan-outs and renamed target modules follow the upstream
/// instrumentation catalog: an integration hooks every module it can attach
/// to, and the module name does not always coincide with the integration
/// name.
fn builtin_specs(options: &CatalogOptions) -> Vec<IntegrationSpec> {
    vec![
        IntegrationSpec::new("aiohttp", true),
        IntegrationSpec::new("asyncio", true),
        IntegrationSpec::new("cassandra", true).with_modules(["cassandra.cluster"]),
        IntegrationSpec::new("celery", true),
        IntegrationSpec::new("django", true),
        IntegrationSpec::new("dogpile_cache", true).with_modules(["dogpile.cache"]),
        IntegrationSpec::new("elasticsearch", true).with_modules([
            "elasticsearch",
            "elasticsearch7",
            "elastic_transport",
            "opensearchpy",
        ]),
        IntegrationSpec::new("flask", true),
        IntegrationSpec::new("futures", true).with_modules(["concurrent.futures.thread"]),
        IntegrationSpec::new("graphql", true),
        IntegrationSpec::new("grpc", true),
        // http.client ships with the host runtime; off unless asked for.
        IntegrationSpec::new("httplib", false).with_modules(["http.client"]),
        IntegrationSpec::new("httpx", true),
        IntegrationSpec::new("kafka", true).with_modules(["confluent_kafka"]),
        IntegrationSpec::new("logging", options.logs_injection),
        IntegrationSpec::new("loguru", options.logs_injection),
        IntegrationSpec::new("mysql", true),
        IntegrationSpec::new("psycopg", true).with_modules(["psycopg", "psycopg2"]),
        IntegrationSpec::new("pymongo", true),
        IntegrationSpec::new("redis", true),
        IntegrationSpec::new("requests", true),
        IntegrationSpec::new("snowflake", false).with_modules(["snowflake.connector"]),
        // Prefer DB client instrumentation over the ORM layer.
        IntegrationSpec::new("sqlalchemy", false),
        IntegrationSpec::new("structlog", options.logs_injection),
        IntegrationSpec::new("tornado", false).with_dependencies(["futures"]),
        IntegrationSpec::new("urllib3", false),
        IntegrationSpec::new("vertica", true).with_modules(["vertica_python"]),
    ]
}

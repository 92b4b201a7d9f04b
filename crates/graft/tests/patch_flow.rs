// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the patching flow: resolution, hook registration,
//! deferred activation, failure isolation, and telemetry reporting.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use graft::{
    adapter_path, AdapterRegistry, AuxiliarySubsystem, GraftError, IntegrationAdapter,
    IntegrationCatalog, IntegrationSpec, Patcher, PatchIndicator, DEFAULT_ADAPTER_PREFIX,
};
use graft_core::ErrorKind;
use graft_test_utils::{
    FailingActivationAdapter, MultiVersionAdapter, RecordingSink, StaticAdapter,
    SubmoduleRecordingAdapter,
};

fn bool_overrides(pairs: &[(&str, bool)]) -> BTreeMap<String, PatchIndicator> {
    pairs
        .iter()
        .map(|(name, enabled)| (name.to_string(), PatchIndicator::Enabled(*enabled)))
        .collect()
}

fn register_shared<A>(registry: &mut AdapterRegistry, name: &str, adapter: &Arc<A>)
where
    A: IntegrationAdapter + 'static,
{
    let adapter = Arc::clone(adapter);
    registry.register(adapter_path(DEFAULT_ADAPTER_PREFIX, name), move || {
        Ok(Box::new(Arc::clone(&adapter)) as Box<dyn IntegrationAdapter>)
    });
}

#[test]
fn broken_integration_does_not_block_healthy_one() {
    let catalog = IntegrationCatalog::new(vec![
        IntegrationSpec::new("broken", true),
        IntegrationSpec::new("healthy", true),
    ])
    .unwrap();

    let healthy = Arc::new(StaticAdapter::new("2.1.0"));
    let mut registry = AdapterRegistry::new();
    register_shared(&mut registry, "healthy", &healthy);
    // "broken" has no adapter registered; its load will fail.

    let sink = Arc::new(RecordingSink::new());
    let patcher = Patcher::builder()
        .catalog(catalog)
        .adapters(registry)
        .telemetry(Arc::clone(&sink) as Arc<dyn graft::TelemetrySink>)
        .build()
        .unwrap();

    patcher
        .patch_all_with_env(&BTreeMap::new(), &BTreeMap::new())
        .unwrap();

    patcher.notify_module_loaded("broken");
    patcher.notify_module_loaded("healthy");

    // Both attempts are recorded; the healthy one actually activated.
    assert_eq!(
        patcher.activated_integrations(),
        vec!["broken".to_string(), "healthy".to_string()]
    );
    assert_eq!(healthy.activations(), 1);

    let healthy_reports = sink.reports_for("healthy");
    assert_eq!(healthy_reports.len(), 1);
    assert!(healthy_reports[0].success);
    assert_eq!(healthy_reports[0].version.as_deref(), Some("2.1.0"));

    let broken_reports = sink.reports_for("broken");
    assert_eq!(broken_reports.len(), 1);
    assert!(!broken_reports[0].success);
    assert!(broken_reports[0].error.is_some());

    let counts = sink.count_metrics();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].namespace, "tracers");
    assert_eq!(counts[0].metric, "integration_errors");
    assert!(counts[0]
        .tags
        .contains(&("integration_name".to_string(), "broken".to_string())));
    assert!(counts[0].tags.contains(&(
        "error_type".to_string(),
        ErrorKind::ImportFailure.to_string()
    )));
}

#[test]
fn multi_module_integration_activates_once() {
    let catalog = IntegrationCatalog::new(vec![
        IntegrationSpec::new("es", true).with_modules(["es_client", "es_transport"]),
    ])
    .unwrap();

    let adapter = Arc::new(StaticAdapter::new("8.0.0"));
    let mut registry = AdapterRegistry::new();
    register_shared(&mut registry, "es", &adapter);

    let sink = Arc::new(RecordingSink::new());
    let patcher = Patcher::builder()
        .catalog(catalog)
        .adapters(registry)
        .telemetry(Arc::clone(&sink) as Arc<dyn graft::TelemetrySink>)
        .build()
        .unwrap();

    patcher
        .patch_all_with_env(&BTreeMap::new(), &BTreeMap::new())
        .unwrap();

    // Both target modules load; only the first hook does the work.
    patcher.notify_module_loaded("es_client");
    patcher.notify_module_loaded("es_transport");

    assert_eq!(adapter.activations(), 1);
    assert_eq!(sink.reports_for("es").len(), 1);
    assert_eq!(patcher.activated_integrations(), vec!["es".to_string()]);
}

#[test]
fn repeated_bulk_activation_is_idempotent() {
    let catalog = IntegrationCatalog::new(vec![IntegrationSpec::new("redis", true)]).unwrap();
    let adapter = Arc::new(StaticAdapter::new("5.0.1"));
    let mut registry = AdapterRegistry::new();
    register_shared(&mut registry, "redis", &adapter);

    let sink = Arc::new(RecordingSink::new());
    let patcher = Patcher::builder()
        .catalog(catalog)
        .adapters(registry)
        .telemetry(Arc::clone(&sink) as Arc<dyn graft::TelemetrySink>)
        .build()
        .unwrap();

    patcher
        .patch_all_with_env(&BTreeMap::new(), &BTreeMap::new())
        .unwrap();
    patcher.notify_module_loaded("redis");

    // A second pass re-registers a hook on the already-loaded module; it
    // fires immediately and hits the idempotence gate.
    patcher
        .patch_all_with_env(&BTreeMap::new(), &BTreeMap::new())
        .unwrap();
    patcher.notify_module_loaded("redis");

    assert_eq!(adapter.activations(), 1);
    assert_eq!(sink.reports_for("redis").len(), 1);
    assert_eq!(patcher.activated_integrations().len(), 1);
}

#[test]
fn hooks_on_shared_module_fire_in_registration_order() {
    let catalog = IntegrationCatalog::new(vec![
        IntegrationSpec::new("first", true).with_modules(["shared"]),
        IntegrationSpec::new("second", true).with_modules(["shared"]),
    ])
    .unwrap();

    let mut registry = AdapterRegistry::new();
    let first = Arc::new(StaticAdapter::without_version());
    let second = Arc::new(StaticAdapter::without_version());
    register_shared(&mut registry, "first", &first);
    register_shared(&mut registry, "second", &second);

    let sink = Arc::new(RecordingSink::new());
    let patcher = Patcher::builder()
        .catalog(catalog)
        .adapters(registry)
        .telemetry(Arc::clone(&sink) as Arc<dyn graft::TelemetrySink>)
        .build()
        .unwrap();

    // Register "second" before "first": registration order, not name order,
    // decides firing order.
    patcher
        .patch(&bool_overrides(&[("second", true)]), false)
        .unwrap();
    patcher
        .patch(&bool_overrides(&[("first", true)]), false)
        .unwrap();

    patcher.notify_module_loaded("shared");

    let names: Vec<String> = sink
        .integration_reports()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["second".to_string(), "first".to_string()]);
}

#[test]
fn strict_activation_of_unknown_name_errors() {
    let catalog = IntegrationCatalog::new(vec![IntegrationSpec::new("known", true)]).unwrap();
    let patcher = Patcher::builder().catalog(catalog).build().unwrap();

    let err = patcher
        .patch(&bool_overrides(&[("nonexistent", true)]), true)
        .unwrap_err();
    assert!(matches!(err, GraftError::IntegrationNotFound { .. }));
}

#[test]
fn strict_activation_propagates_load_failure_for_loaded_module() {
    let catalog = IntegrationCatalog::new(vec![IntegrationSpec::new("redis", true)]).unwrap();
    let patcher = Patcher::builder().catalog(catalog).build().unwrap();

    // Module loaded before instrumentation: the hook fires during patch()
    // and the missing adapter aborts the strict request.
    patcher.notify_module_loaded("redis");
    let err = patcher
        .patch(&bool_overrides(&[("redis", true)]), true)
        .unwrap_err();
    assert!(matches!(err, GraftError::AdapterLoad { .. }));
}

#[test]
fn caller_override_beats_env_override() {
    let catalog = IntegrationCatalog::new(vec![IntegrationSpec::new("x", false)]).unwrap();
    let sink = Arc::new(RecordingSink::new());
    let patcher = Patcher::builder()
        .catalog(catalog)
        .telemetry(Arc::clone(&sink) as Arc<dyn graft::TelemetrySink>)
        .build()
        .unwrap();

    let env = BTreeMap::from([("GRAFT_X_ENABLED".to_string(), "true".to_string())]);
    patcher
        .patch_all_with_env(&env, &bool_overrides(&[("x", false)]))
        .unwrap();

    patcher.notify_module_loaded("x");
    assert!(patcher.activated_integrations().is_empty());
    assert!(sink.integration_reports().is_empty());
}

#[test]
fn invalid_env_value_fails_before_any_hook_registration() {
    let catalog = IntegrationCatalog::new(vec![IntegrationSpec::new("x", true)]).unwrap();
    let patcher = Patcher::builder().catalog(catalog).build().unwrap();

    let env = BTreeMap::from([("GRAFT_X_ENABLED".to_string(), "maybe".to_string())]);
    let err = patcher
        .patch_all_with_env(&env, &BTreeMap::new())
        .unwrap_err();
    assert!(matches!(err, GraftError::Config(_)));

    // Nothing was registered.
    patcher.notify_module_loaded("x");
    assert!(patcher.activated_integrations().is_empty());
}

#[test]
fn dependency_is_activated_alongside_dependent() {
    let catalog = IntegrationCatalog::new(vec![
        IntegrationSpec::new("foo", true),
        IntegrationSpec::new("bar", false).with_dependencies(["foo"]),
    ])
    .unwrap();

    let foo = Arc::new(StaticAdapter::new("1.0.0"));
    let bar = Arc::new(StaticAdapter::new("2.0.0"));
    let mut registry = AdapterRegistry::new();
    register_shared(&mut registry, "foo", &foo);
    register_shared(&mut registry, "bar", &bar);

    let patcher = Patcher::builder()
        .catalog(catalog)
        .adapters(registry)
        .build()
        .unwrap();

    patcher
        .patch_all_with_env(&BTreeMap::new(), &bool_overrides(&[("bar", true)]))
        .unwrap();

    patcher.notify_module_loaded("foo");
    patcher.notify_module_loaded("bar");

    assert_eq!(foo.activations(), 1);
    assert_eq!(bar.activations(), 1);
    assert_eq!(
        patcher.activated_integrations(),
        vec!["bar".to_string(), "foo".to_string()]
    );
}

#[test]
fn component_versions_fan_out_into_separate_reports() {
    let catalog = IntegrationCatalog::new(vec![IntegrationSpec::new("search", true)]).unwrap();
    let adapter = Arc::new(MultiVersionAdapter::new([
        ("search_client", "7.17.0"),
        ("search_transport", "8.1.0"),
    ]));
    let mut registry = AdapterRegistry::new();
    register_shared(&mut registry, "search", &adapter);

    let sink = Arc::new(RecordingSink::new());
    let patcher = Patcher::builder()
        .catalog(catalog)
        .adapters(registry)
        .telemetry(Arc::clone(&sink) as Arc<dyn graft::TelemetrySink>)
        .build()
        .unwrap();

    patcher
        .patch_all_with_env(&BTreeMap::new(), &BTreeMap::new())
        .unwrap();
    patcher.notify_module_loaded("search");

    let reports = sink.integration_reports();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].name, "search_client");
    assert_eq!(reports[0].version.as_deref(), Some("7.17.0"));
    assert_eq!(reports[1].name, "search_transport");
    assert!(reports.iter().all(|r| r.success));
}

#[test]
fn activation_failure_is_reported_with_error_kind() {
    let catalog = IntegrationCatalog::new(vec![IntegrationSpec::new("flaky", false)]).unwrap();
    let adapter = Arc::new(FailingActivationAdapter::new("target refused to be rewired"));
    let mut registry = AdapterRegistry::new();
    register_shared(&mut registry, "flaky", &adapter);

    let sink = Arc::new(RecordingSink::new());
    let patcher = Patcher::builder()
        .catalog(catalog)
        .adapters(registry)
        .telemetry(Arc::clone(&sink) as Arc<dyn graft::TelemetrySink>)
        .build()
        .unwrap();

    patcher
        .patch_all_with_env(&BTreeMap::new(), &bool_overrides(&[("flaky", true)]))
        .unwrap();
    patcher.notify_module_loaded("flaky");

    let reports = sink.reports_for("flaky");
    assert_eq!(reports.len(), 1);
    assert!(!reports[0].success);
    // Default-enabled flag reflects the catalog, not the override.
    assert!(!reports[0].enabled_by_default);

    let counts = sink.count_metrics();
    assert!(counts[0].tags.contains(&(
        "error_type".to_string(),
        ErrorKind::ActivationFailure.to_string()
    )));
}

#[test]
fn submodule_patcher_receives_indicator_and_strictness() {
    let catalog = IntegrationCatalog::new(vec![IntegrationSpec::new("sub", true)]).unwrap();
    let adapter = Arc::new(SubmoduleRecordingAdapter::new());
    let mut registry = AdapterRegistry::new();
    register_shared(&mut registry, "sub", &adapter);

    let patcher = Patcher::builder()
        .catalog(catalog)
        .adapters(registry)
        .build()
        .unwrap();

    let indicator = PatchIndicator::Modules(vec!["sub_extra".to_string()]);
    let overrides = BTreeMap::from([("sub".to_string(), indicator.clone())]);
    patcher
        .patch_all_with_env(&BTreeMap::new(), &overrides)
        .unwrap();
    patcher.notify_module_loaded("sub_extra");

    assert_eq!(adapter.submodule_calls(), vec![(indicator, false)]);
}

#[test]
fn custom_adapter_prefix_is_honored() {
    let catalog = IntegrationCatalog::new(vec![IntegrationSpec::new("redis", true)]).unwrap();
    let adapter = Arc::new(StaticAdapter::new("5.0.1"));
    let mut registry = AdapterRegistry::new();
    let shared = Arc::clone(&adapter);
    registry.register("acme.instrument.redis", move || {
        Ok(Box::new(Arc::clone(&shared)) as Box<dyn IntegrationAdapter>)
    });

    let patcher = Patcher::builder()
        .catalog(catalog)
        .adapters(registry)
        .adapter_prefix("acme.instrument")
        .build()
        .unwrap();

    patcher.notify_module_loaded("redis");
    patcher
        .patch(&bool_overrides(&[("redis", true)]), true)
        .unwrap();

    assert_eq!(adapter.activations(), 1);
}

struct FakeSubsystem {
    enabled: bool,
    enable_calls: Arc<AtomicUsize>,
    fail: bool,
}

impl AuxiliarySubsystem for FakeSubsystem {
    fn name(&self) -> &str {
        "analysis"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&self) -> Result<(), GraftError> {
        self.enable_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(GraftError::Internal("analysis bootstrap failed".into()))
        } else {
            Ok(())
        }
    }
}

#[test]
fn auxiliary_subsystem_gated_by_its_own_check() {
    let catalog = IntegrationCatalog::new(vec![IntegrationSpec::new("x", true)]).unwrap();
    let enabled_calls = Arc::new(AtomicUsize::new(0));
    let disabled_calls = Arc::new(AtomicUsize::new(0));

    let patcher = Patcher::builder()
        .catalog(catalog)
        .auxiliary(Box::new(FakeSubsystem {
            enabled: true,
            enable_calls: Arc::clone(&enabled_calls),
            fail: false,
        }))
        .auxiliary(Box::new(FakeSubsystem {
            enabled: false,
            enable_calls: Arc::clone(&disabled_calls),
            fail: false,
        }))
        .build()
        .unwrap();

    patcher
        .patch_all_with_env(&BTreeMap::new(), &BTreeMap::new())
        .unwrap();

    assert_eq!(enabled_calls.load(Ordering::SeqCst), 1);
    assert_eq!(disabled_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn auxiliary_failure_does_not_fail_bulk_activation() {
    let catalog = IntegrationCatalog::new(vec![IntegrationSpec::new("x", true)]).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let patcher = Patcher::builder()
        .catalog(catalog)
        .auxiliary(Box::new(FakeSubsystem {
            enabled: true,
            enable_calls: Arc::clone(&calls),
            fail: true,
        }))
        .build()
        .unwrap();

    patcher
        .patch_all_with_env(&BTreeMap::new(), &BTreeMap::new())
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn hooks_fire_from_other_threads() {
    let catalog = IntegrationCatalog::new(vec![
        IntegrationSpec::new("a", true),
        IntegrationSpec::new("b", true),
    ])
    .unwrap();

    let a = Arc::new(StaticAdapter::without_version());
    let b = Arc::new(StaticAdapter::without_version());
    let mut registry = AdapterRegistry::new();
    register_shared(&mut registry, "a", &a);
    register_shared(&mut registry, "b", &b);

    let patcher = Arc::new(
        Patcher::builder()
            .catalog(catalog)
            .adapters(registry)
            .build()
            .unwrap(),
    );
    patcher
        .patch_all_with_env(&BTreeMap::new(), &BTreeMap::new())
        .unwrap();

    let handles: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|module| {
            let patcher = Arc::clone(&patcher);
            std::thread::spawn(move || {
                patcher.notify_module_loaded(module);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(a.activations(), 1);
    assert_eq!(b.activations(), 1);
    assert_eq!(
        patcher.activated_integrations(),
        vec!["a".to_string(), "b".to_string()]
    );
}

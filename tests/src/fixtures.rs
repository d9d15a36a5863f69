//! # Course Platform Fixture
//!
//! A small multi-tenant course platform wired through every crate:
//!
//! | Component | Type | Entry points |
//! |-----------|------|--------------|
//! | `grades` | `GradeBook` | `list` GET, `publish` POST, `syllabus` GET |
//! | `profile` | `Profile` (per request) | `view` GET, `update` POST |
//! | `dashboard` | `Dashboard` | `summary` GET, `export` GET |
//! | `health` | `Health` | `ping` GET |
//!
//! Type graph: `GradeBook`, `Profile` and `Dashboard` extend `Service`;
//! `Dashboard` also implements `Reporting`.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared_types::{HttpVerb, Identity};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tg_01_rights::{RightsCatalogue, RightsHierarchy};
use tg_02_decision::{Combinator, MatchMode, SecurityDeclaration};
use tg_03_registry::{
    Binding, Component, ComponentDescriptor, HandlerError, Invocation, Registry, RegistryBuilder,
    RegistryConfig, RegistrySnapshot, TypeDescriptor,
};
use tg_04_dispatch::{DispatchConfig, Dispatcher};

pub const RIGHTS_JSON: &str = r#"[
    {"id": "CourseAdmin"},
    {"id": "CourseAdmin.Grades", "parent": "CourseAdmin"},
    {"id": "CourseAdmin.Roster", "parent": "CourseAdmin"},
    {"id": "Reports"}
]"#;

pub fn rights() -> Arc<RightsHierarchy> {
    let catalogue = RightsCatalogue::from_json(RIGHTS_JSON).unwrap();
    Arc::new(catalogue.build().unwrap())
}

/// Records every call it receives and echoes method and caller back.
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Component for Recorder {
    async fn invoke(&self, call: Invocation) -> Result<Value, HandlerError> {
        self.calls.lock().push(call.method.clone());
        let caller = match call.caller {
            Identity::User(id) => json!(id.as_str()),
            Identity::Anonymous => Value::Null,
        };
        Ok(json!({"method": call.method, "caller": caller, "sub_path": call.sub_path}))
    }
}

pub fn types(list_mode: MatchMode) -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor::new("Service").secured(SecurityDeclaration::new()),
        TypeDescriptor::new("Reporting")
            .secure_method("export", SecurityDeclaration::new().requiring("Reports")),
        TypeDescriptor::new("GradeBook")
            .extends("Service")
            .secured(
                SecurityDeclaration::new()
                    .requiring("CourseAdmin")
                    .with_match_mode(list_mode),
            )
            .secure_method("publish", SecurityDeclaration::new().requiring("CourseAdmin"))
            .secure_method("syllabus", SecurityDeclaration::public()),
        TypeDescriptor::new("Profile").extends("Service").secure_method(
            "update",
            SecurityDeclaration::new()
                .requiring("CourseAdmin.Roster")
                .with_combinator(Combinator::Or)
                .by_owner(),
        ),
        TypeDescriptor::new("Dashboard")
            .extends("Service")
            .implements("Reporting"),
        TypeDescriptor::new("Health").secured(SecurityDeclaration::public()),
    ]
}

pub struct Platform {
    pub dispatcher: Arc<Dispatcher>,
    pub registry: Arc<Registry>,
    pub recorder: Arc<Recorder>,
    pub profiles_created: Arc<AtomicUsize>,
}

/// Snapshot of the full platform, sharing `recorder` as the handler of
/// every component.
pub fn snapshot(
    list_mode: MatchMode,
    recorder: &Arc<Recorder>,
    profiles_created: &Arc<AtomicUsize>,
) -> RegistrySnapshot {
    let created = Arc::clone(profiles_created);
    let profile_recorder = Arc::clone(recorder);
    let profile_factory = move || -> Arc<dyn Component> {
        created.fetch_add(1, Ordering::SeqCst);
        profile_recorder.clone()
    };

    RegistryBuilder::new(rights())
        .with_config(RegistryConfig::from_json(r#"{"undeclared_policy": "deny"}"#).unwrap())
        .with_types(types(list_mode))
        .with_component(
            ComponentDescriptor::singleton("grades", "GradeBook", recorder.clone())
                .with_entry_point("list", [HttpVerb::Get])
                .with_entry_point("publish", [HttpVerb::Post])
                .with_entry_point("syllabus", [HttpVerb::Get]),
        )
        .with_component(
            ComponentDescriptor::per_request("profile", "Profile", profile_factory)
                .with_entry_point("view", [HttpVerb::Get])
                .with_entry_point("update", [HttpVerb::Post]),
        )
        .with_component(
            ComponentDescriptor::singleton("dashboard", "Dashboard", recorder.clone())
                .with_entry_point("summary", [HttpVerb::Get])
                .with_entry_point("export", [HttpVerb::Get])
                .with_binding(
                    "Reporting",
                    Binding::new()
                        .with_route("/reports")
                        .with_config_schema(json!({"type": "object"})),
                ),
        )
        .with_component(
            ComponentDescriptor::singleton("health", "Health", recorder.clone())
                .with_entry_point("ping", [HttpVerb::Get]),
        )
        .build()
        .unwrap()
}

pub fn platform() -> Platform {
    platform_with(DispatchConfig::default())
}

pub fn platform_with(config: DispatchConfig) -> Platform {
    gate_telemetry::init_test_logging();

    let recorder = Arc::new(Recorder::default());
    let profiles_created = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(Registry::new(snapshot(
        MatchMode::WithDescendants,
        &recorder,
        &profiles_created,
    )));
    let dispatcher = Arc::new(Dispatcher::with_config(Arc::clone(&registry), config).unwrap());

    Platform {
        dispatcher,
        registry,
        recorder,
        profiles_created,
    }
}

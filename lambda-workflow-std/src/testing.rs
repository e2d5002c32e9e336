//! Testing utilities for lambda-workflow.
//!
//! This module provides utilities to make testing actions, handlers and
//! whole workflows easier.
//!
//! # Features
//!
//! - [`TypeMapInjector`]: An in-memory injector for handlers resolving dependencies
//! - [`CallLog`]: A shared, ordered record of calls
//! - [`RecordingAction`]: An action that writes its label into a [`CallLog`]
//! - [`FailingAction`]: An action that always fails

use lambda_workflow_core::{
    Action, BoxError, Context, Dependency, Injector, ResolveError,
};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Type Map Injector
// ============================================================================

/// An injector backed by two maps, one keyed by type and one by name.
///
/// Cloning is cheap and clones share the provided values, so a configured
/// injector can serve as the template of a bootstrap.
///
/// # Example
///
/// ```rust,ignore
/// let injector = TypeMapInjector::new()
///     .provide(CarRepository::in_memory())
///     .provide_named("table", "cars".to_string());
///
/// let workflow = ProxyWorkflow::builder()
///     .set_bootstrap(bootstrap(move || injector.clone()))
///     .add_get_handler("/car/{id}", get_car)
///     .build()?;
/// ```
#[derive(Clone, Default)]
pub struct TypeMapInjector {
    by_type: HashMap<TypeId, Dependency>,
    by_name: HashMap<String, Dependency>,
}

impl TypeMapInjector {
    /// Create an empty injector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide `value`, resolvable by its type.
    pub fn provide<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.by_type.insert(TypeId::of::<T>(), Arc::new(value));
        self
    }

    /// Provide `value`, resolvable by `name`.
    pub fn provide_named<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.by_name.insert(name.into(), Arc::new(value));
        self
    }

    /// Number of provided values.
    pub fn len(&self) -> usize {
        self.by_type.len() + self.by_name.len()
    }

    /// Check if nothing was provided.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty() && self.by_name.is_empty()
    }
}

impl Injector for TypeMapInjector {
    fn resolve_type(
        &self,
        type_id: TypeId,
        type_name: &'static str,
    ) -> Result<Dependency, ResolveError> {
        self.by_type
            .get(&type_id)
            .cloned()
            .ok_or(ResolveError::NotRegistered(type_name))
    }

    fn resolve_name(&self, name: &str) -> Result<Dependency, ResolveError> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::NameNotRegistered(name.to_string()))
    }
}

// ============================================================================
// Call Log
// ============================================================================

/// A shared, ordered record of calls.
///
/// Actions and handlers write labels into the same log, so tests can assert
/// the order in which a workflow ran them.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::new();
/// let handler_log = log.clone();
///
/// let workflow = ProxyWorkflow::builder()
///     .add_pre_action(log.action("pre"))
///     .add_get_handler("/", move |_: &mut Context| handler_log.record("handler"))
///     .build()?;
///
/// workflow.handle(request)?;
/// assert_eq!(log.entries(), ["pre", "handler"]);
/// ```
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `label`.
    pub fn record(&self, label: impl Into<String>) {
        self.lock().push(label.into());
    }

    /// A [`RecordingAction`] writing `label` into this log.
    pub fn action(&self, label: impl Into<String>) -> RecordingAction {
        RecordingAction {
            label: label.into(),
            log: self.clone(),
        }
    }

    /// Get a clone of the recorded labels.
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Get the number of recorded labels.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Concatenate the recorded labels.
    pub fn joined(&self) -> String {
        self.lock().concat()
    }

    /// Clear all recorded labels.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

// ============================================================================
// Recording Action
// ============================================================================

/// An action that records its label every time it runs.
pub struct RecordingAction {
    label: String,
    log: CallLog,
}

impl RecordingAction {
    /// Create an action recording `label` into a fresh log.
    pub fn new(label: impl Into<String>) -> Self {
        CallLog::new().action(label)
    }

    /// The log this action writes into.
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Number of times the action ran.
    pub fn count(&self) -> usize {
        self.log.lock().iter().filter(|l| **l == self.label).count()
    }
}

impl Action for RecordingAction {
    fn run(&self, _ctx: &mut Context) -> Result<(), BoxError> {
        self.log.record(self.label.clone());
        Ok(())
    }
}

// ============================================================================
// Failing Action
// ============================================================================

/// An action that always fails with the same message.
#[derive(Clone)]
pub struct FailingAction {
    message: String,
    calls: Arc<AtomicUsize>,
}

impl FailingAction {
    /// Create an action failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times the action ran, shared between clones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Action for FailingAction {
    fn run(&self, _ctx: &mut Context) -> Result<(), BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.message.clone().into())
    }
}

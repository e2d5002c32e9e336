//! Dependency injection contract.
//!
//! The workflow does not ship a container. It only needs something that can
//! resolve a value by type or by name, which is what [`Injector`] describes.
//! A [`Bootstrap`] factory builds a fresh injector for every invocation.

use crate::error::ResolveError;
use std::{
    any::{Any, TypeId, type_name},
    sync::Arc,
};

/// A type-erased dependency as stored by an injector.
pub type Dependency = Arc<dyn Any + Send + Sync>;

/// Resolves dependencies by type or by name.
///
/// The methods are object safe; use the typed helpers on `dyn Injector`
/// ([`resolve`](trait.Injector.html#method.resolve),
/// [`resolve_by_name`](trait.Injector.html#method.resolve_by_name)) from
/// handlers and actions.
pub trait Injector: Send + Sync {
    /// Resolve the dependency registered for `type_id`.
    fn resolve_type(&self, type_id: TypeId, type_name: &'static str)
    -> Result<Dependency, ResolveError>;

    /// Resolve the dependency registered under `name`.
    fn resolve_name(&self, name: &str) -> Result<Dependency, ResolveError>;
}

impl dyn Injector + '_ {
    /// Resolve a dependency by its type.
    pub fn resolve<T: Any + Send + Sync>(&self) -> Result<Arc<T>, ResolveError> {
        let name = type_name::<T>();
        self.resolve_type(TypeId::of::<T>(), name)?
            .downcast::<T>()
            .map_err(|_| ResolveError::TypeMismatch {
                name: name.to_string(),
                expected: name,
            })
    }

    /// Resolve a dependency by its registration name.
    pub fn resolve_by_name<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ResolveError> {
        self.resolve_name(name)?
            .downcast::<T>()
            .map_err(|_| ResolveError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }
}

/// Factory producing the injector for one invocation.
///
/// Called exactly once per invocation; the injector is dropped with the
/// invocation context.
pub type Bootstrap = Arc<dyn Fn() -> Box<dyn Injector> + Send + Sync>;

/// Wrap a closure returning a concrete injector into a [`Bootstrap`].
pub fn bootstrap<F, I>(factory: F) -> Bootstrap
where
    F: Fn() -> I + Send + Sync + 'static,
    I: Injector + 'static,
{
    Arc::new(move || Box::new(factory()) as Box<dyn Injector>)
}

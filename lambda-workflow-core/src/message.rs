//! Message trait for event types.

use std::any::Any;

/// A marker trait for inbound events a workflow can be driven by.
///
/// Events are moved into the invocation [`Context`](crate::Context) and read
/// back through its typed accessor, so they must be `Any + Send + Sync`.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Serialize)]
/// struct ScheduledEvent { id: String }
///
/// impl Message for ScheduledEvent {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + Sync + 'static`",
    note = "Workflow events are stored type-erased in the invocation context."
)]
pub trait Message: Any + Send + Sync + 'static {}

impl Message for () {}
impl Message for String {}
impl Message for Vec<u8> {}
impl Message for serde_json::Value {}
impl<T: Message> Message for Box<T> {}

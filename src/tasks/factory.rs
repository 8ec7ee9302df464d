//! # Task factories: the re-instantiation seam.
//!
//! Hot reload needs a way to build a *fresh* instance of a task's
//! implementation while the process runs. A [`TaskFactory`] is registered
//! per task name at install time; reload asks it for a new instance and
//! replaces the registry entry only when the build succeeds. Build failures
//! (including panics, which the supervisor catches) leave the previous
//! entry untouched.

use std::borrow::Cow;
use std::sync::Arc;

use crate::context::Context;
use crate::error::TaskError;
use crate::tasks::TaskRef;

/// Shared handle to a factory.
pub type FactoryRef = Arc<dyn TaskFactory>;

/// Builds fresh instances of one task.
pub trait TaskFactory: Send + Sync + 'static {
    /// Name of the task this factory builds — the registry key.
    fn name(&self) -> &str;

    /// Builds a fresh instance against the runtime context.
    fn build(&self, ctx: &Context) -> Result<TaskRef, TaskError>;
}

/// Function-backed factory.
///
/// ## Example
/// ```
/// use std::sync::Arc;
/// use dugout::{FactoryFn, FactoryRef, TaskRef};
/// # use async_trait::async_trait;
/// # use dugout::{Context, Outcome, Task, TaskError};
/// # struct Downloader;
/// # #[async_trait]
/// # impl Task for Downloader {
/// #     fn name(&self) -> &str { "downloader" }
/// #     async fn setup(&self, _ctx: &Context) -> Result<Outcome, TaskError> { Ok(Outcome::empty()) }
/// #     async fn run(&self, _ctx: &Context) -> Result<Outcome, TaskError> { Ok(Outcome::empty()) }
/// # }
///
/// let factory: FactoryRef = FactoryFn::arc("downloader", |_ctx| {
///     Ok(Arc::new(Downloader) as TaskRef)
/// });
/// assert_eq!(factory.name(), "downloader");
/// ```
pub struct FactoryFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> FactoryFn<F>
where
    F: Fn(&Context) -> Result<TaskRef, TaskError> + Send + Sync + 'static,
{
    /// Creates a function-backed factory.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the factory and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> TaskFactory for FactoryFn<F>
where
    F: Fn(&Context) -> Result<TaskRef, TaskError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, ctx: &Context) -> Result<TaskRef, TaskError> {
        (self.f)(ctx)
    }
}

//! Dispatcher-level error handler.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use teloxide::error_handlers::ErrorHandler;

use crate::monitor::Monitor;

/// Routes every error that escapes a handler or the update listener into
/// the monitor. Never re-raises.
pub struct DispatchErrorHandler {
    monitor: Arc<Monitor>,
    context: &'static str,
}

impl DispatchErrorHandler {
    pub fn new(monitor: Arc<Monitor>, context: &'static str) -> Self {
        Self { monitor, context }
    }
}

impl<E> ErrorHandler<E> for DispatchErrorHandler
where
    E: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    fn handle_error(self: Arc<Self>, error: E) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            self.monitor.log_error(&error, Some(self.context)).await;
        })
    }
}

//! Bot module - Core bot functionality.

pub mod dispatcher;
mod error_handler;
mod runtime;

pub use dispatcher::{ThrottledBot, build_dispatcher};
pub use error_handler::DispatchErrorHandler;
pub use runtime::run;

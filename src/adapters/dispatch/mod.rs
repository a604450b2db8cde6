//! Webhook dispatcher adapters.

mod logging;

pub use logging::LoggingDispatcher;

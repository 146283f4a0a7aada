//! Request middleware: trace identifiers and failure logging.

pub mod failure_log;
pub mod trace;

pub use failure_log::FailureLog;
pub use trace::Trace;

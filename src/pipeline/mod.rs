pub mod collect;
pub mod content;
pub mod decode;
pub mod error;
pub mod observer;
pub mod orchestrator;
pub mod poll;
pub mod run;
pub mod session;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ReportError, Stage};
pub use observer::{ReportObserver, TracingObserver};
pub use orchestrator::ReportOrchestrator;
pub use poll::RunPoller;

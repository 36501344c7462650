mod attempt;
pub mod cancel;
pub mod concurrency;
mod deadline;
pub mod events;
pub mod monitor;
mod request;
mod result;
mod scheduler;
pub mod status;

pub use attempt::AttemptExecutor;
pub use cancel::CancellationSignal;
pub use deadline::DeadlineGuard;
pub use events::{
    CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink, TracingEventSink,
};
pub use monitor::{progress_bar, ActiveTask, StatusMonitor, StatusRenderer, StatusSnapshot};
pub use request::build_request;
pub use result::{ExecutionError, RunOutcome};
pub use scheduler::Executor;
pub use status::{RunProgress, StatusBoard};

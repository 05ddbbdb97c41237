//! raceguard-core — the Djit+ vector-clock dynamic data-race analyzer.
//!
//! Feature layout:
//!
//! - `domain`      : vector clocks, entity ids, the event stream, violations
//! - `application`  : the Analyzer and the Event Dispatcher
//! - `ports`        : trait boundaries to the event source and reporter
//!
//! Binary instrumentation, event replay, and output formatting all live
//! outside this crate, in `raceguard-io` and `raceguard-cli`.

pub mod application;
pub mod domain;
pub mod error;
pub mod ports;

pub use application::{Analyzer, Dispatcher};
pub use domain::{AccessKind, AnalyzerSnapshot, Event, RegistrationPolicy, ThreadId, VectorClock, Violation};
pub use error::AnalyzerError;
pub use ports::{EventSource, Reporter};

//! Core data model: vector clocks, entity ids, the event stream, and
//! violation reports.

pub mod clock;
pub mod event;
pub mod ids;
pub mod policy;
pub mod snapshot;
pub mod violation;

pub use clock::VectorClock;
pub use event::{AccessKind, Event};
pub use ids::ThreadId;
pub use policy::RegistrationPolicy;
pub use snapshot::AnalyzerSnapshot;
pub use violation::Violation;

//! raceguard-io — the external collaborators around the Djit+ core: a
//! replay-file event source, watch-set loading, and reporters. Nothing
//! here participates in the vector-clock update rules; this crate only
//! adapts `raceguard-core`'s ports to files and streams.

pub mod error;
pub mod event_source;
pub mod reporter;
pub mod watchset;

pub use error::IoError;
pub use event_source::{JsonlEventSource, ReplayDispatcher};
pub use reporter::{JsonReporter, TextReporter};
pub use watchset::load_watch_set;

//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the flush pipeline.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Event timestamps travel as strict RFC 3339 strings with fractional seconds
//! - Parsing into instants happens in `flush_engine::clock`, never here

mod batch;
mod blueprint;
mod error;
mod flush;
mod item;
mod queue;
mod transport;

pub use batch::*;
pub use blueprint::*;
pub use error::*;
pub use flush::{FlushReport, FlushStage, FlushState};
pub use item::*;
pub use queue::{DurableQueue, LocalDurableQueue};
pub use transport::{LocalTransport, Transport};

//! Actor-based concurrency primitives.
//!
//! Instead of wrapping the store in `Arc<Mutex<...>>`, every caller (HTTP
//! handler, CLI command, REPL loop) communicates with it via message
//! passing. State is owned, not shared.
//!
//! # Architecture
//!
//! - [`StoreActor`]: the single serializing worker that owns the store and
//!   drains a bounded FIFO job queue, one operation at a time
//! - [`StoreHandle`]: cloneable submission handle; each request carries a
//!   dedicated oneshot reply channel
//! - [`admission`]: the outer worker that serializes inbound HTTP requests
//!   before they ever reach the store actor

pub mod admission;
pub mod handle;
pub mod message;
mod worker;

pub use handle::StoreHandle;
pub use message::{RequestId, SendError, StoreJob, StoreOp, StoreReply};
pub use worker::{StoreActor, StoreActorConfig};

//! Client-side task lifecycle for the Vidgist gateway.
//!
//! After a video upload produces an indexing task, this crate watches the
//! task through the gateway until it reaches a terminal state, then notifies
//! dependent queries exactly once through an explicit invalidation bus.
//! Polling is strictly sequential and bounded; exhausting the attempt budget
//! is a distinct terminal state rather than an endless loop.

pub mod bus;
pub mod client;
pub mod error;
pub mod poller;

pub use bus::{GenerationOp, InvalidationBus, QueryKey};
pub use client::{GatewayClient, GatewayClientConfig, GeneratedArtifacts, UploadSource};
pub use error::{PollerError, PollerResult};
pub use poller::{LifecycleHandle, PollerConfig, PollerState, TaskLifecycle};

//! Publish/subscribe mechanics for pushed chat payloads.
//!
//! Store-backed channels (Redis) live in `relaychat-infra`; this crate only
//! holds the transport-agnostic subscription handle and an in-process hub.

pub mod bus;
pub mod in_memory_bus;

pub use bus::{PayloadStream, Subscription};
pub use in_memory_bus::InMemoryChannel;

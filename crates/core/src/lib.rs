//! `relaychat-core` — chat message model shared by every layer.
//!
//! This crate contains **pure** types (no IO): the message entity, its
//! identifier, the fixed date format and the error taxonomy used by the
//! store adapters and HTTP handlers.

pub mod date;
pub mod error;
pub mod id;
pub mod message;

pub use error::{RelayError, RelayResult};
pub use id::MessageId;
pub use message::{Message, NewMessage, decode_batch, encode_batch};

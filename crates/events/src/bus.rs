//! Subscription handle (mechanics only).
//!
//! A subscription yields published payloads **verbatim**: the strings are the
//! already-encoded JSON batches, so forwarding them to a viewer never re-encodes.
//!
//! ## Delivery
//!
//! - **No replay**: a subscription only sees payloads published after it exists
//! - **Order-preserving**: payloads arrive in publish order for a single channel
//! - **At-least-once at best**: a broken connection ends the stream; nothing is redelivered
//!
//! ## Usage Pattern
//!
//! ```ignore
//! let mut sub = store.subscribe().await?;
//! while let Some(next) = sub.recv().await {
//!     match next {
//!         Ok(payload) => forward(payload).await?,
//!         Err(e) => break, // channel broken, tear down
//!     }
//! }
//! ```

use std::pin::Pin;

use tokio_stream::{Stream, StreamExt};

use relaychat_core::RelayError;

/// Boxed stream of published payloads.
pub type PayloadStream = Pin<Box<dyn Stream<Item = Result<String, RelayError>> + Send>>;

/// A live subscription to a payload channel.
///
/// Owns whatever connection backs it: dropping the subscription releases the
/// connection. Designed for a single consumer task.
pub struct Subscription {
    inner: PayloadStream,
}

impl Subscription {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<String, RelayError>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// Wait for the next payload.
    ///
    /// `None` means the channel closed cleanly; `Some(Err(_))` means it broke.
    pub async fn recv(&mut self) -> Option<Result<String, RelayError>> {
        self.inner.next().await
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

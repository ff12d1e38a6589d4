//! Transport trait - delivery channel interface
//!
//! Defines the abstract interface for the outbound delivery channels.

use crate::BridgeError;

/// Delivery channel trait
///
/// A transport is bound to exactly one remote endpoint for the lifetime of
/// the process (or until explicitly closed) and is exclusively owned by the
/// delivery loop; it is never shared across concurrent senders.
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Transport name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one encoded event document
    ///
    /// # Errors
    /// Returns a per-message send error; the retry policy (if any) is the
    /// variant's own and has already run by the time this returns.
    async fn send(&mut self, document: &[u8]) -> Result<(), BridgeError>;

    /// Close the channel, best-effort release
    async fn close(&mut self) -> Result<(), BridgeError>;
}

/// Object-safe boxed transport, as held by the delivery loop.
pub type BoxedTransport = Box<dyn DynTransport>;

/// Object-safe mirror of [`Transport`].
///
/// `trait_variant` traits are not object safe, so the loop holds this
/// dyn-compatible wrapper instead. Blanket-implemented for every
/// [`Transport`].
pub trait DynTransport: Send {
    fn name(&self) -> &str;

    fn send<'a>(
        &'a mut self,
        document: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), BridgeError>> + Send + 'a>>;

    fn close(
        &mut self,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), BridgeError>> + Send + '_>>;
}

impl<T: Transport> DynTransport for T {
    fn name(&self) -> &str {
        Transport::name(self)
    }

    fn send<'a>(
        &'a mut self,
        document: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), BridgeError>> + Send + 'a>>
    {
        Box::pin(Transport::send(self, document))
    }

    fn close(
        &mut self,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), BridgeError>> + Send + '_>>
    {
        Box::pin(Transport::close(self))
    }
}

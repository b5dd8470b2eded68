use crate::error::ChannelError;
use async_trait::async_trait;
use huddle_core::SignalEvent;
use tokio::sync::mpsc;

/// Events delivered by a [`SignalingChannel`], in relay forwarding order.
#[derive(Debug)]
pub enum ChannelEvent {
    Signal(SignalEvent),
    /// The underlying transport dropped. Emitted at most once per
    /// connection; the coordinator must close every peer session when it
    /// sees this. Reconnection is the caller's decision.
    Disconnected,
}

/// Bidirectional message transport between this client and the relay.
///
/// One instance per client session, passed in explicitly so tests can run
/// many independent clients in one process.
#[async_trait]
pub trait SignalingChannel: Send + Sync {
    /// Opens the transport and returns the inbound event stream. The
    /// stream is the single ordered delivery path: whoever drains it is
    /// the one logical thread of signaling execution.
    async fn connect(&self) -> Result<mpsc::Receiver<ChannelEvent>, ChannelError>;

    /// Closes the transport. Idempotent.
    async fn disconnect(&self);

    /// Best-effort send. Silently dropped while disconnected; callers
    /// must not send before `connect` has completed.
    async fn send(&self, event: SignalEvent);
}

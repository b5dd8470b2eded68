/// Commands queued into a peer session's mailbox.
///
/// The mailbox is the per-session operation queue: commands are taken one
/// at a time and each suspending negotiation operation finishes before
/// the next command is read, so operations for one remote endpoint can
/// never interleave.
#[derive(Debug)]
pub enum SessionCommand {
    /// Create and send the local offer (Initiator role only).
    StartOffer,

    /// A remote offer arrived through the relay.
    RemoteOffer { sdp: String },

    /// A remote answer arrived through the relay.
    RemoteAnswer { sdp: String },

    /// A remote ICE candidate arrived through the relay.
    RemoteCandidate { candidate: String },

    /// Tear the session down. Terminal; the mailbox closes afterwards, so
    /// any command still in flight toward this session is a no-op.
    Close,
}

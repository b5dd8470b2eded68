/// Buffers remote ICE candidates that arrive before the remote
/// description is applied.
///
/// Relay latency routinely delivers candidates ahead of the offer or
/// answer they belong to. Applying one against a transport with no remote
/// description fails, so early arrivals are held here and replayed, in
/// arrival order, the moment the description lands.
#[derive(Debug, Default)]
pub struct CandidateQueue {
    pending: Vec<String>,
    ready: bool,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a remote candidate. Returns it back when the remote
    /// description is already applied (apply now); otherwise buffers it
    /// and returns `None`.
    pub fn accept(&mut self, candidate: String) -> Option<String> {
        if self.ready {
            Some(candidate)
        } else {
            self.pending.push(candidate);
            None
        }
    }

    /// Marks the remote description as applied and drains everything
    /// buffered so far, in arrival order.
    pub fn mark_ready(&mut self) -> Vec<String> {
        self.ready = true;
        std::mem::take(&mut self.pending)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

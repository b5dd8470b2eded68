use crate::model::endpoint::EndpointId;
use std::time::SystemTime;

/// Local view of a remote room member. Created from `user-joined` /
/// `existing-users` notifications, dropped on `user-left` or disconnect.
#[derive(Debug, Clone)]
pub struct Participant {
    pub endpoint: EndpointId,
    pub display_name: String,
    pub joined_at: SystemTime,
}

impl Participant {
    pub fn new(endpoint: EndpointId, display_name: impl Into<String>) -> Self {
        Self {
            endpoint,
            display_name: display_name.into(),
            joined_at: SystemTime::now(),
        }
    }
}

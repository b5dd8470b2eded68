use huddle_core::IceServerConfig;

/// STUN/TURN configuration applied to every peer session in a room.
#[derive(Clone)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec!["stun:stun.l.google.com:19302".to_owned()],
                username: None,
                credential: None,
            }],
        }
    }
}

impl TransportConfig {
    /// No ICE servers at all; host candidates only. Used for in-process
    /// loopback testing.
    pub fn host_only() -> Self {
        Self {
            ice_servers: Vec::new(),
        }
    }
}

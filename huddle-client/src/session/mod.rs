mod candidate_queue;
mod peer_session;
mod session_command;
mod session_event;
mod transport;
mod transport_config;

pub use candidate_queue::*;
pub use peer_session::*;
pub use session_command::*;
pub use session_event::*;
pub use transport::*;
pub use transport_config::*;

//! Client-side orchestrator for peer-to-peer room calls.
//!
//! A [`RoomClient`](room::RoomClient) drives one room: it acquires local
//! media once, connects a [`SignalingChannel`](signaling::SignalingChannel)
//! to the relay, and maintains one peer session per remote participant,
//! each negotiating its own media transport through offer/answer/ICE
//! exchange.

pub use webrtc;

pub mod error;
pub mod media;
pub mod room;
pub mod session;
pub mod signaling;

pub use error::*;
pub use media::*;
pub use room::*;
pub use session::{NegotiationRole, SessionState, TransportConfig};
pub use signaling::*;

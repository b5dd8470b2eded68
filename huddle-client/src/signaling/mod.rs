mod channel;
mod protocol;
mod ws_channel;

pub use channel::*;
pub use protocol::*;
pub use ws_channel::*;

mod coordinator;
mod room_command;
mod room_events;

pub use coordinator::*;
pub use room_command::*;
pub use room_events::*;

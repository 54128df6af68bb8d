// Messaging module - commands from input handlers into the engine

pub mod channels;
pub mod command;

pub use channels::{CommandConsumer, CommandProducer, create_command_channel};
pub use command::{Command, drain_commands};

use clap::Subcommand;
use strum::{Display, EnumString};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Start,
    Stop,
    Toggle,
    ConfigReload,
}

/// Control commands, sent over the socket as one lowercase word per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Command {
    /// Spin the disk and start spawning notes
    Start,
    /// Stop the disk; notes already in the air finish their flight
    Stop,
    /// Start when stopped, stop when running
    Toggle,
}

impl From<Command> for AppEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => AppEvent::Start,
            Command::Stop => AppEvent::Stop,
            Command::Toggle => AppEvent::Toggle,
        }
    }
}

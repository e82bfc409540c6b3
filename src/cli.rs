use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::protocol::Command as DeviceCommand;

/// The command line interface for the SmartParallel host tool.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Serial device path.
    #[arg(short, long, default_value = "/dev/ttyACM0")]
    pub device: String,

    /// Baud rate.
    #[arg(short, long, default_value_t = 115_200)]
    pub baud: u32,

    /// Also log to daily files in this directory.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log more.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Commands available in the command line interface.
#[derive(Subcommand)]
pub enum Commands {
    /// Print each frame the device sends, until interrupted.
    Listen,

    /// Send lines of text to the printer.
    Send {
        /// The text; each argument becomes one printed line.
        lines: Vec<String>,
    },

    /// Send a single named command byte.
    Command {
        /// One of the device commands, e.g. `ping` or `report-state`.
        #[arg(value_enum)]
        name: CommandName,
    },

    /// Initialise the printer and set tab positions.
    Init,
}

/// Clap-friendly names for the device command set.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
#[allow(missing_docs)]
pub enum CommandName {
    Ping,
    AckDisable,
    AckEnable,
    AutofeedDisable,
    AutofeedEnable,
    PrintModeNormal,
    PrintModeCondensed,
    PrintModeDouble,
    LineEndNormal,
    LinefeedLf,
    LinefeedCr,
    LinefeedCrLf,
    ReportState,
    ReportAck,
    ReportAutofeed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn send_keeps_connection_args_usable() {
        // `send` consumes its line arguments; the connection settings
        // must still be readable alongside them.
        let cli = Cli::parse_from(["smartparallel", "-d", "/dev/ttyUSB1", "send", "one", "two"]);

        assert_eq!(cli.device, "/dev/ttyUSB1");
        match cli.command {
            Commands::Send { lines } => assert_eq!(lines, ["one", "two"]),
            _ => panic!("expected send"),
        }
    }
}

impl From<CommandName> for DeviceCommand {
    fn from(name: CommandName) -> Self {
        match name {
            CommandName::Ping => DeviceCommand::Ping,
            CommandName::AckDisable => DeviceCommand::AckDisable,
            CommandName::AckEnable => DeviceCommand::AckEnable,
            CommandName::AutofeedDisable => DeviceCommand::AutofeedDisable,
            CommandName::AutofeedEnable => DeviceCommand::AutofeedEnable,
            CommandName::PrintModeNormal => DeviceCommand::PrintModeNormal,
            CommandName::PrintModeCondensed => DeviceCommand::PrintModeCondensed,
            CommandName::PrintModeDouble => DeviceCommand::PrintModeDouble,
            CommandName::LineEndNormal => DeviceCommand::LineEndNormal,
            CommandName::LinefeedLf => DeviceCommand::LinefeedLf,
            CommandName::LinefeedCr => DeviceCommand::LinefeedCr,
            CommandName::LinefeedCrLf => DeviceCommand::LinefeedCrLf,
            CommandName::ReportState => DeviceCommand::ReportState,
            CommandName::ReportAck => DeviceCommand::ReportAck,
            CommandName::ReportAutofeed => DeviceCommand::ReportAutofeed,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Byte used to terminate messages *sent to* the device.
///
/// Note the asymmetry: the device terminates its *outgoing* messages with
/// [`RECEIVE_TERMINATOR`] instead. The two must not be conflated.
pub const SEND_TERMINATOR: u8 = 0;

/// Byte terminating messages *received from* the device (ASCII newline).
pub const RECEIVE_TERMINATOR: u8 = 10;

/// ASCII command code, sent ahead of each command byte.
pub const COMMAND_MARKER: u8 = 1;

/// Default capacity of the receive buffer, and the hard cap on a single
/// received frame.
pub const READ_BUF_SIZE: usize = 1024;

/// Default number of printer columns (it's an Epson MX-80).
pub const DEFAULT_COLUMNS: usize = 80;

/// Byte sequence to initialise the printer (ESC @, for Epson).
pub const INIT: [u8; 2] = [27, 64];

/// Sent at the end of each line of text (CR LF).
pub const LINE_END: [u8; 2] = [13, 10];

/// Code to set tab positions.
pub const SET_TABS: [u8; 2] = [1, 64];

/// Commands understood by the SmartParallel board.
///
/// On the wire each command is a [`COMMAND_MARKER`], the command byte,
/// then a [`SEND_TERMINATOR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Check if the SmartParallel is alive and connected.
    Ping,

    /// Disable use of ACK in printing.
    AckDisable,

    /// Enable use of ACK in printing.
    AckEnable,

    /// Disable use of the printer's AUTOFEED function.
    AutofeedDisable,

    /// Enable use of the printer's AUTOFEED function.
    AutofeedEnable,

    /// Print in standard 80-column mode.
    PrintModeNormal,

    /// Print in 132-column condensed mode.
    PrintModeCondensed,

    /// Print in 40-column double-width mode.
    PrintModeDouble,

    /// Don't add anything to ends of lines (default).
    LineEndNormal,

    /// Add linefeeds (ASCII 10) to ends of lines.
    LinefeedLf,

    /// Add carriage returns (ASCII 13) to ends of lines.
    LinefeedCr,

    /// Add both CR and LF to ends of lines.
    LinefeedCrLf,

    /// Request a status report from the SmartParallel.
    ReportState,

    /// Check if use of ACK is enabled.
    ReportAck,

    /// Check if AUTOFEED is enabled.
    ReportAutofeed,
}

impl Command {
    /// The command's byte value on the wire.
    pub fn as_byte(&self) -> u8 {
        match self {
            Command::Ping => 1,
            Command::AckDisable => 2,
            Command::AckEnable => 3,
            Command::AutofeedDisable => 4,
            Command::AutofeedEnable => 5,
            Command::PrintModeNormal => 8,
            Command::PrintModeCondensed => 9,
            Command::PrintModeDouble => 10,
            Command::LineEndNormal => 16,
            Command::LinefeedLf => 17,
            Command::LinefeedCr => 18,
            Command::LinefeedCrLf => 19,
            Command::ReportState => 32,
            Command::ReportAck => 33,
            Command::ReportAutofeed => 34,
        }
    }

    /// The inverse of [`Command::as_byte`].
    pub fn from_byte(byte: u8) -> Option<Self> {
        let command = match byte {
            1 => Command::Ping,
            2 => Command::AckDisable,
            3 => Command::AckEnable,
            4 => Command::AutofeedDisable,
            5 => Command::AutofeedEnable,
            8 => Command::PrintModeNormal,
            9 => Command::PrintModeCondensed,
            10 => Command::PrintModeDouble,
            16 => Command::LineEndNormal,
            17 => Command::LinefeedLf,
            18 => Command::LinefeedCr,
            19 => Command::LinefeedCrLf,
            32 => Command::ReportState,
            33 => Command::ReportAck,
            34 => Command::ReportAutofeed,
            _ => return None,
        };
        Some(command)
    }

    /// The full wire form: marker, command byte, send terminator.
    pub fn encode(&self) -> [u8; 3] {
        [COMMAND_MARKER, self.as_byte(), SEND_TERMINATOR]
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?} ({})", self.as_byte())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn command_bytes_round_trip() {
        for byte in 0..=u8::MAX {
            if let Some(command) = Command::from_byte(byte) {
                assert_eq!(command.as_byte(), byte);
            }
        }
    }

    #[test]
    fn commands_encode_with_marker_and_terminator() {
        assert_eq!(Command::Ping.encode(), [1, 1, 0]);
        assert_eq!(Command::ReportState.encode(), [1, 32, 0]);
    }

    #[test]
    fn terminator_conventions_are_distinct() {
        // Send and receive terminators differ on this device.
        assert_eq!(SEND_TERMINATOR, 0);
        assert_eq!(RECEIVE_TERMINATOR, b'\n');
    }
}

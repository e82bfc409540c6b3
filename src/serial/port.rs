use std::io::Write;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use crate::error::Error;
use crate::protocol::{Command, INIT, LINE_END, SEND_TERMINATOR, SET_TABS};
use crate::serial::frame::{FrameReader, FrameStatus};

/// Configuration for a serial port connection to the SmartParallel.
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Serial port path (e.g., /dev/ttyUSB0, /dev/ttyACM0, COM3).
    pub path: String,

    /// Baud rate.
    pub baud: u32,

    /// Read timeout. Surfaces as a timed-out frame status when the
    /// device stays quiet for this long during a read.
    pub timeout: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            path: String::from("/dev/ttyACM0"),
            baud: 115_200,
            timeout: Duration::from_secs(5),
        }
    }
}

impl PortConfig {
    /// A configuration for the given path with default settings.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }

    /// Set the baud rate.
    pub fn baud(mut self, baud: u32) -> Self {
        self.baud = baud;
        self
    }

    /// Set the read timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A blocking connection to the SmartParallel board.
///
/// Owns the underlying handle for its whole lifetime; dropping the
/// connection closes the port. The line is always 8N1 with no flow
/// control, which is what the board speaks.
pub struct Connection {
    port: Box<dyn SerialPort>,
    config: PortConfig,
    reader: FrameReader,
}

impl Connection {
    /// Open a serial connection with the given configuration.
    pub fn open(config: PortConfig) -> Result<Self, Error> {
        let port = serialport::new(&config.path, config.baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|e| Error::Port {
                path: config.path.clone(),
                problem: e.to_string(),
            })?;

        info!(%config.path, %config.baud, "Serial port open");

        Ok(Self {
            port,
            config,
            reader: FrameReader::new(),
        })
    }

    /// The port configuration.
    pub fn config(&self) -> &PortConfig {
        &self.config
    }

    /// Pull the next frame from the device into `buf`.
    ///
    /// The buffer belongs to the caller and should be reused across
    /// calls; see [`FrameReader::read_frame`].
    pub fn read_frame(&mut self, buf: &mut Vec<u8>) -> (usize, FrameStatus) {
        self.reader.read_frame(&mut self.port, buf)
    }

    /// Send a command to the board.
    pub fn write_command(&mut self, command: Command) -> Result<(), Error> {
        debug!(%command, "Sending command");
        self.port.write_all(&command.encode())?;
        Ok(())
    }

    /// Send one line of text for printing: the text, CR LF, then the
    /// send terminator.
    pub fn write_line(&mut self, line: &str) -> Result<(), Error> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(&LINE_END)?;
        self.port.write_all(&[SEND_TERMINATOR])?;
        Ok(())
    }

    /// Initialise the printer (ESC @).
    pub fn init_printer(&mut self) -> Result<(), Error> {
        self.port.write_all(&INIT)?;
        self.port.write_all(&[SEND_TERMINATOR])?;
        Ok(())
    }

    /// Set the printer's tab positions.
    pub fn set_tabs(&mut self) -> Result<(), Error> {
        self.port.write_all(&SET_TABS)?;
        self.port.write_all(&[SEND_TERMINATOR])?;
        Ok(())
    }

    /// Flush any buffered output to the device.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.port.flush()?;
        Ok(())
    }
}

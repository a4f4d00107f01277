use crate::error::Result;
use log::debug;
use std::io::{BufRead, BufReader, ErrorKind};
use std::time::Duration;

/// Per-read timeout applied to serial ports
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Longest line kept while waiting for a terminator
///
/// NMEA caps sentences at 82 characters; anything far beyond that is noise
/// from a misconfigured port.
pub const MAX_LINE_LEN: usize = 256;

/// Result of one bounded line read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete line with the line terminator removed
    Line(String),
    /// No complete line is available yet
    Timeout,
    /// The source is exhausted and will never yield another line
    EndOfStream,
}

/// Line-oriented source with a bounded wait per read
pub trait LineSource {
    fn read_line(&mut self) -> Result<ReadOutcome>;
}

/// Adapts any buffered reader into a `LineSource`
///
/// Each call performs at most one underlying read, so a receiver that never
/// sends a terminator cannot hold the caller past its deadline. Bytes that
/// are not valid UTF-8 are replaced rather than reported. A partial line is
/// kept and completed on a later read, unless it grows past
/// [`MAX_LINE_LEN`], in which case it is dropped.
pub struct ReaderLineSource<R: BufRead> {
    reader: R,
    pending: Vec<u8>,
}

impl<R: BufRead> ReaderLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::with_capacity(128),
        }
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.pending)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        self.pending.clear();
        line
    }

    fn discard_if_overlong(&mut self) -> bool {
        if self.pending.len() > MAX_LINE_LEN {
            debug!("Dropping {} bytes without a line terminator", self.pending.len());
            self.pending.clear();
            return true;
        }
        false
    }
}

impl<R: BufRead> LineSource for ReaderLineSource<R> {
    fn read_line(&mut self) -> Result<ReadOutcome> {
        let available = match self.reader.fill_buf() {
            Ok(available) => available,
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                return Ok(ReadOutcome::Timeout);
            }
            Err(err) => return Err(err.into()),
        };

        if available.is_empty() {
            if self.pending.is_empty() {
                return Ok(ReadOutcome::EndOfStream);
            }
            // unterminated tail before EOF
            return Ok(ReadOutcome::Line(self.take_line()));
        }

        match available.iter().position(|&b| b == b'\n') {
            Some(end) => {
                self.pending.extend_from_slice(&available[..=end]);
                self.reader.consume(end + 1);
                if self.discard_if_overlong() {
                    return Ok(ReadOutcome::Timeout);
                }
                Ok(ReadOutcome::Line(self.take_line()))
            }
            None => {
                let consumed = available.len();
                self.pending.extend_from_slice(available);
                self.reader.consume(consumed);
                self.discard_if_overlong();
                Ok(ReadOutcome::Timeout)
            }
        }
    }
}

/// Line source backed by an open serial port
pub type SerialLineSource = ReaderLineSource<BufReader<Box<dyn serialport::SerialPort>>>;

/// Open a serial GPS receiver for line reading
pub fn open_serial(path: &str, baud_rate: u32, read_timeout: Duration) -> Result<SerialLineSource> {
    debug!(
        "Opening serial port {} at {} baud (timeout {:?})",
        path, baud_rate, read_timeout
    );
    let port = serialport::new(path, baud_rate)
        .timeout(read_timeout)
        .data_bits(serialport::DataBits::Eight)
        .open()?;
    Ok(ReaderLineSource::new(BufReader::new(port)))
}

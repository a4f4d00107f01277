use std::fmt;

/// Error types for the GPS event logger
#[derive(Debug)]
pub enum LoggerError {
    /// I/O errors from the line source or the log directory
    Io(std::io::Error),
    /// Serial port could not be opened or configured
    Serial(serialport::Error),
    /// JSON document (de)serialization errors
    Json(serde_json::Error),
    /// CSV track errors
    #[cfg(feature = "csv")]
    Csv(csv::Error),
    /// Sentence could not be decoded; never surfaced past the decoder
    Decode(String),
    /// Record writer failure
    Export(String),
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerError::Io(err) => write!(f, "I/O error: {}", err),
            LoggerError::Serial(err) => write!(f, "Serial port error: {}", err),
            LoggerError::Json(err) => write!(f, "JSON error: {}", err),
            #[cfg(feature = "csv")]
            LoggerError::Csv(err) => write!(f, "CSV error: {}", err),
            LoggerError::Decode(msg) => write!(f, "Decode error: {}", msg),
            LoggerError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::Io(err) => Some(err),
            LoggerError::Serial(err) => Some(err),
            LoggerError::Json(err) => Some(err),
            #[cfg(feature = "csv")]
            LoggerError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(err: std::io::Error) -> Self {
        LoggerError::Io(err)
    }
}

impl From<serialport::Error> for LoggerError {
    fn from(err: serialport::Error) -> Self {
        LoggerError::Serial(err)
    }
}

impl From<serde_json::Error> for LoggerError {
    fn from(err: serde_json::Error) -> Self {
        LoggerError::Json(err)
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for LoggerError {
    fn from(err: csv::Error) -> Self {
        LoggerError::Csv(err)
    }
}

impl LoggerError {
    /// True for errors the decoder swallows rather than propagating
    pub fn is_decode(&self) -> bool {
        matches!(self, LoggerError::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, LoggerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category() {
        let err = LoggerError::Decode("too few fields".to_string());
        assert_eq!(err.to_string(), "Decode error: too few fields");
        assert!(err.is_decode());

        let err = LoggerError::Export("disk full".to_string());
        assert_eq!(err.to_string(), "Export error: disk full");
        assert!(!err.is_decode());
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "no data");
        let err: LoggerError = io.into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("I/O error"));
    }
}

//! Trajectory records and the sinks that consume them.
//!
//! A trajectory file is plain text with one record per line and no header:
//!
//! ```text
//! 0.000,        0.174533, 0.174532900000000
//! ```
//!
//! Time has three fractional digits, `theta1` is right-aligned in a 15-wide
//! field with six fractional digits, and `theta2` has fifteen fractional
//! digits.

use std::{
    convert::Infallible,
    error::Error as StdError,
    fmt,
    io::{self, BufWriter, IntoInnerError, Write},
};

/// Angles of both arms at one reporting boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRecord {
    pub t: f64,
    pub theta1: f64,
    pub theta2: f64,
}

impl fmt::Display for TrajectoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}, {:15.6}, {:.15}", self.t, self.theta1, self.theta2)
    }
}

/// Destination for trajectory records.
///
/// Records arrive in time order, one per reporting boundary, on the thread
/// running the integration. A returned error ends the recording.
pub trait TrajectorySink {
    type Error: StdError + Send + Sync + 'static;

    /// Consumes one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    fn write_record(&mut self, record: &TrajectoryRecord) -> Result<(), Self::Error>;
}

/// Collects records in memory.
impl TrajectorySink for Vec<TrajectoryRecord> {
    type Error = Infallible;

    fn write_record(&mut self, record: &TrajectoryRecord) -> Result<(), Self::Error> {
        self.push(*record);
        Ok(())
    }
}

/// Writes records as text lines through a buffer.
///
/// Call [`finish`](Self::finish) to flush; dropping the writer also flushes
/// but discards any error.
#[derive(Debug)]
pub struct TrajectoryWriter<W: Write> {
    inner: BufWriter<W>,
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: BufWriter::new(inner),
        }
    }

    /// Flushes buffered lines and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn finish(self) -> io::Result<W> {
        self.inner.into_inner().map_err(IntoInnerError::into_error)
    }
}

impl<W: Write> TrajectorySink for TrajectoryWriter<W> {
    type Error = io::Error;

    fn write_record(&mut self, record: &TrajectoryRecord) -> Result<(), Self::Error> {
        writeln!(self.inner, "{record}")
    }
}

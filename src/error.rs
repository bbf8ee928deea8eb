use std::io;

/// Errors reported by [`LinePrefixWriter`](crate::LinePrefixWriter).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The writer was closed; no bytes were accepted.
    #[error("write on closed line prefix writer")]
    Closed,

    /// The underlying sink failed while a line was being flushed.
    ///
    /// `accepted` counts the input bytes fully processed before the failure.
    /// Anything already flushed to the sink stays there.
    #[error("sink write failed after {accepted} input bytes")]
    Sink {
        /// Input bytes processed before the failing flush.
        accepted: usize,
        /// The error returned by the sink.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Number of input bytes processed before this error.
    #[must_use]
    pub fn accepted(&self) -> usize {
        match self {
            Error::Closed => 0,
            Error::Sink { accepted, .. } => *accepted,
        }
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Closed => io::Error::new(io::ErrorKind::BrokenPipe, Error::Closed),
            Error::Sink { source, .. } => source,
        }
    }
}

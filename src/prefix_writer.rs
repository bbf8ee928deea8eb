use parking_lot::Mutex;
use std::io::{
    self,
    Write,
};
use tracing::{
    debug,
    trace,
};

use crate::builder::Builder;
use crate::color::ColorAdapter;
use crate::error::Error;
use crate::escape::Unescaper;
use crate::prefix::Prefixes;

/// Buffers written bytes until a newline and then writes the line to the
/// underlying writer, prefixed with the configured prefixes.
///
/// Writes and [`close`](LinePrefixWriter::close) take the same lock, so lines
/// from one writer never interleave even when many threads write through a
/// shared reference. Content that never saw a newline is written without a
/// prefix when the writer is closed or dropped.
#[derive(Debug)]
pub struct LinePrefixWriter<W: Write> {
    prefixes: Prefixes,
    color: Option<ColorAdapter>,

    state: Mutex<State<W>>,
}

#[derive(Debug)]
struct State<W> {
    writer: W,
    buffer: Vec<u8>,
    unescaper: Unescaper,

    // start of line content in `buffer`, after the color sequence
    content_start: usize,

    opened: bool,
    closed: bool,
}

impl LinePrefixWriter<io::Stdout> {
    /// Starts configuring a writer. Output goes to stdout unless
    /// [`Builder::writer`] is used.
    #[must_use]
    pub fn builder() -> Builder<io::Stdout> {
        Builder::new()
    }
}

impl<W: Write> LinePrefixWriter<W> {
    /// Create a new [`LinePrefixWriter`] without prefixes or color that
    /// writes to `writer`.
    pub fn new(writer: W) -> Self {
        Builder::new().writer(writer).build()
    }

    pub(crate) fn from_parts(
        writer: W,
        prefixes: Prefixes,
        color: Option<ColorAdapter>,
        render_escaped: bool,
    ) -> Self {
        Self {
            prefixes,
            color,

            state: Mutex::new(State {
                writer,
                buffer: Vec::new(),
                unescaper: Unescaper::new(render_escaped),
                content_start: 0,
                opened: false,
                closed: false,
            }),
        }
    }

    /// Processes all of `buf`, writing out every line it completes.
    ///
    /// # Errors
    ///
    /// [`Error::Closed`] if the writer was closed, [`Error::Sink`] if the
    /// underlying writer failed. Lines written before the failure stay
    /// written.
    pub fn write_bytes(&self, buf: &[u8]) -> Result<usize, Error> {
        let mut state = self.state.lock();

        if state.closed {
            return Err(Error::Closed);
        }

        if buf.is_empty() {
            return Ok(0);
        }

        let State {
            writer,
            buffer,
            unescaper,
            content_start,
            opened,
            ..
        } = &mut *state;

        if !*opened {
            *opened = true;
            debug!("opened line prefix writer");

            self.start_line(buffer, content_start)
                .map_err(sink_error(0))?;
        }

        let mut at = 0;
        while at < buf.len() {
            let step = unescaper.step(buf, at);

            if let Some(byte) = step.output {
                self.push(writer, buffer, content_start, byte)
                    .map_err(sink_error(at))?;
            }

            at += step.consumed;
        }

        Ok(buf.len())
    }

    /// Closes the writer and writes out the unterminated rest of the current
    /// line, without prefix or newline. Writes after this fail with
    /// [`Error::Closed`]. Closing again does nothing.
    ///
    /// A trailing escape marker still waiting for its next byte is dropped.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying writer.
    pub fn close(&self) -> io::Result<()> {
        let mut state = self.state.lock();

        if state.closed {
            return Ok(());
        }
        state.closed = true;

        let State {
            writer,
            buffer,
            unescaper,
            content_start,
            ..
        } = &mut *state;

        let tail = buffer.len() - *content_start;
        debug!(
            tail,
            dropped_escape = unescaper.is_pending(),
            "closing line prefix writer"
        );

        if tail > 0 {
            if let Some(ref color) = self.color {
                color.disable(buffer)?;
            }

            writer.write_all(buffer)?;
        }
        buffer.clear();

        writer.flush()
    }

    /// True once [`close`](LinePrefixWriter::close) was called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn push(
        &self,
        writer: &mut W,
        buffer: &mut Vec<u8>,
        content_start: &mut usize,
        byte: u8,
    ) -> io::Result<()> {
        let eol = byte == b'\n';

        if eol {
            if let Some(ref color) = self.color {
                color.disable(buffer)?;
            }
        }

        buffer.push(byte);

        if eol {
            self.write_line(writer, buffer, content_start)?;
            self.start_line(buffer, content_start)?;
        }

        Ok(())
    }

    fn write_line(
        &self,
        writer: &mut W,
        buffer: &mut Vec<u8>,
        content_start: &mut usize,
    ) -> io::Result<()> {
        // one write per line keeps lines whole on writers shared between
        // several LinePrefixWriters
        let mut line = self.prefixes.render();
        let prefix_len = line.len();
        line.extend_from_slice(buffer);

        writer.write_all(&line)?;
        trace!(prefix = prefix_len, line = buffer.len(), "wrote line");

        buffer.clear();
        *content_start = 0;

        Ok(())
    }

    fn start_line(&self, buffer: &mut Vec<u8>, content_start: &mut usize) -> io::Result<()> {
        if let Some(ref color) = self.color {
            color.enable(buffer)?;
        }
        *content_start = buffer.len();

        Ok(())
    }
}

fn sink_error(accepted: usize) -> impl FnOnce(io::Error) -> Error {
    move |source| Error::Sink { accepted, source }
}

impl<W: Write> Write for &LinePrefixWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf)?)
    }

    /// Flushes the underlying writer. A partial line stays buffered.
    fn flush(&mut self) -> io::Result<()> {
        self.state.lock().writer.flush()
    }
}

impl<W: Write> Write for LinePrefixWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut &*self)
    }
}

impl<W: Write> Drop for LinePrefixWriter<W> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

use std::io::{self, Read, Write};

use crate::foundation::core::Frame;
use crate::foundation::error::CrtResult;
use crate::session::filter_session::FilterSession;

/// Outcome of handing one frame to a [`FrameWriter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The consumer stopped accepting data.
    Closed,
}

/// Why [`run_stream`] stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamEnd {
    /// The input ended, possibly with a discarded partial frame.
    InputExhausted,
    OutputClosed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamSummary {
    /// Frames read, filtered and written.
    pub frames: u64,
    /// Frames among those answered from the frame cache.
    pub reused: u64,
    pub end: StreamEnd,
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}

/// Reads whole raw frames of native-endian packed pixels.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: R,
    scratch: Vec<u8>,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            scratch: Vec::new(),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fill `frame` from the next `frame.byte_len()` bytes.
    ///
    /// Returns `Ok(false)` at end of input. A trailing partial frame is discarded.
    pub fn read_frame(&mut self, frame: &mut Frame) -> CrtResult<bool> {
        self.scratch.resize(frame.byte_len(), 0);
        let mut filled = 0;
        while filled < self.scratch.len() {
            match self.inner.read(&mut self.scratch[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if is_transient(&e) => {
                    tracing::debug!(kind = ?e.kind(), "retrying read");
                    std::thread::yield_now();
                }
                Err(e) => return Err(e.into()),
            }
        }
        if filled < self.scratch.len() {
            if filled > 0 {
                tracing::warn!(
                    got = filled,
                    expected = self.scratch.len(),
                    "discarding partial trailing frame"
                );
            }
            return Ok(false);
        }
        frame.load_ne_bytes(&self.scratch)?;
        Ok(true)
    }
}

/// Writes whole raw frames and flushes after each one.
#[derive(Debug)]
pub struct FrameWriter<W> {
    inner: W,
    scratch: Vec<u8>,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            scratch: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_frame(&mut self, frame: &Frame) -> CrtResult<WriteOutcome> {
        frame.store_ne_bytes(&mut self.scratch);
        let mut written = 0;
        while written < self.scratch.len() {
            match self.inner.write(&self.scratch[written..]) {
                Ok(0) => return Ok(WriteOutcome::Closed),
                Ok(n) => written += n,
                Err(e) if is_transient(&e) => {
                    tracing::debug!(kind = ?e.kind(), "retrying write");
                    std::thread::yield_now();
                }
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    return Ok(WriteOutcome::Closed);
                }
                Err(e) => return Err(e.into()),
            }
        }
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(WriteOutcome::Written),
                Err(e) if is_transient(&e) => std::thread::yield_now(),
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    return Ok(WriteOutcome::Closed);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Pump frames from `input` through `session` into `output`, one in and one out, in order.
pub fn run_stream<R: Read, W: Write>(
    input: R,
    output: W,
    session: &mut FilterSession,
) -> CrtResult<StreamSummary> {
    let mut reader = FrameReader::new(input);
    let mut writer = FrameWriter::new(output);
    let mut frame = Frame::new(session.layout().input);
    let mut frames = 0u64;
    let mut reused = 0u64;

    let end = loop {
        if !reader.read_frame(&mut frame)? {
            break StreamEnd::InputExhausted;
        }
        let reused_before = session.stats().frames_reused;
        let out = session.process_frame(&frame)?;
        if writer.write_frame(out)? == WriteOutcome::Closed {
            break StreamEnd::OutputClosed;
        }
        frames += 1;
        if session.stats().frames_reused > reused_before {
            reused += 1;
        }
    };

    let summary = StreamSummary {
        frames,
        reused,
        end,
    };
    tracing::info!(
        frames = summary.frames,
        reused = summary.reused,
        end = ?summary.end,
        "stream finished"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "../../tests/unit/stream/io.rs"]
mod tests;

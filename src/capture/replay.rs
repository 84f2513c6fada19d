//! In-memory frame source that plays back a scripted sequence.

use std::collections::VecDeque;
use std::io;

use super::{FrameSource, Receive};

#[derive(Debug)]
enum Step {
    Frame(Vec<u8>),
    Error(io::ErrorKind),
    Idle,
}

/// Plays back frames, idle ticks and receive errors in order, then
/// reports `Closed`.
#[derive(Debug)]
pub struct ReplayCapture {
    name: String,
    steps: VecDeque<Step>,
    current: Vec<u8>,
    closed: bool,
}

impl ReplayCapture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: VecDeque::new(),
            current: Vec::new(),
            closed: false,
        }
    }

    /// Build a replay from a list of frames.
    pub fn from_frames<I>(name: impl Into<String>, frames: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        frames
            .into_iter()
            .fold(Self::new(name), |replay, frame| replay.with_frame(frame))
    }

    pub fn with_frame(mut self, frame: Vec<u8>) -> Self {
        self.steps.push_back(Step::Frame(frame));
        self
    }

    /// Queue a transient receive failure.
    pub fn with_error(mut self, kind: io::ErrorKind) -> Self {
        self.steps.push_back(Step::Error(kind));
        self
    }

    /// Queue a read timeout with no traffic.
    pub fn with_idle(mut self) -> Self {
        self.steps.push_back(Step::Idle);
        self
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl FrameSource for ReplayCapture {
    fn next_frame(&mut self) -> io::Result<Receive<'_>> {
        if self.closed {
            return Ok(Receive::Closed);
        }

        match self.steps.pop_front() {
            Some(Step::Frame(frame)) => {
                self.current = frame;
                Ok(Receive::Frame(&self.current))
            }
            Some(Step::Error(kind)) => Err(io::Error::new(kind, "replayed receive error")),
            Some(Step::Idle) => Ok(Receive::Idle),
            None => Ok(Receive::Closed),
        }
    }

    fn close(&mut self) {
        self.closed = true;
        self.steps.clear();
    }

    fn interface_name(&self) -> &str {
        &self.name
    }
}

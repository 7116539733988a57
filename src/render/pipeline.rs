//! Backpressure-aware frame production
//!
//! `FrameProducer` renders one frame at a time and only moves on once a
//! `FrameSink` has taken it. A busy sink leaves the cursor where it was, so
//! `pump` can simply be called again after the consumer drains.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::error::{GrowthError, Result, SinkError};
use crate::GrowthSession;

/// A rasterized frame ready for encoding. Clones share the pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub index: usize,
    /// Growth distance shown
    pub progress: f64,
    pub image: Arc<RgbaImage>,
}

/// Consumer of rendered frames, typically an encoder
pub trait FrameSink {
    /// Take `frame`, or refuse it. `SinkError::Busy` means "offer it again later".
    fn accept(&mut self, frame: &RenderedFrame) -> std::result::Result<(), SinkError>;
}

impl<F> FrameSink for F
where
    F: FnMut(&RenderedFrame) -> std::result::Result<(), SinkError>,
{
    fn accept(&mut self, frame: &RenderedFrame) -> std::result::Result<(), SinkError> {
        self(frame)
    }
}

/// Sink backed by a bounded channel
pub struct ChannelSink {
    sender: SyncSender<RenderedFrame>,
    blocking: bool,
}

impl ChannelSink {
    /// A full queue refuses frames with `SinkError::Busy`
    pub fn bounded(capacity: usize) -> (Self, Receiver<RenderedFrame>) {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        (Self { sender, blocking: false }, receiver)
    }

    /// A full queue blocks the producer until the consumer drains
    pub fn blocking(capacity: usize) -> (Self, Receiver<RenderedFrame>) {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        (Self { sender, blocking: true }, receiver)
    }
}

impl FrameSink for ChannelSink {
    fn accept(&mut self, frame: &RenderedFrame) -> std::result::Result<(), SinkError> {
        if self.blocking {
            return self.sender.send(frame.clone()).map_err(|_| SinkError::Closed);
        }
        match self.sender.try_send(frame.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SinkError::Busy),
            Err(TrySendError::Disconnected(_)) => Err(SinkError::Closed),
        }
    }
}

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Renders a session's timeline one accepted frame at a time
pub struct FrameProducer {
    session: GrowthSession,
    cursor: usize,
    /// Rendered but not yet accepted
    pending: Option<RenderedFrame>,
}

impl FrameProducer {
    pub fn new(session: GrowthSession) -> Self {
        Self {
            session,
            cursor: 0,
            pending: None,
        }
    }

    pub fn session(&self) -> &GrowthSession {
        &self.session
    }

    /// Index of the next frame to hand out
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn total_frames(&self) -> usize {
        self.session.timeline().total_frames
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.total_frames()
    }

    /// Render frame `index` without touching the cursor
    pub fn render(&self, index: usize) -> RenderedFrame {
        let frame = self.session.frame(index);
        RenderedFrame {
            index,
            progress: frame.progress,
            image: Arc::new(self.session.render(&frame)),
        }
    }

    /// Frame at the cursor, rendered once and kept until accepted
    pub fn next_frame(&mut self) -> Option<&RenderedFrame> {
        if self.is_finished() {
            return None;
        }
        if self.pending.is_none() {
            self.pending = Some(self.render(self.cursor));
        }
        self.pending.as_ref()
    }

    /// Offer the frame at the cursor to `sink`; `Ok(false)` once all frames are out
    pub fn offer<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<bool> {
        let index = self.cursor;
        let Some(frame) = self.next_frame() else {
            return Ok(false);
        };
        if let Err(source) = sink.accept(frame) {
            return Err(GrowthError::Sink { frame: index, source });
        }

        self.pending = None;
        self.cursor += 1;
        Ok(true)
    }
}

#[cfg(feature = "parallel")]
impl FrameProducer {
    /// Compose every frame of the timeline concurrently
    pub fn flatten_all_parallel(&self) -> Vec<super::Frame> {
        use rayon::prelude::*;

        (0..self.total_frames())
            .into_par_iter()
            .map(|i| self.session.frame(i))
            .collect()
    }
}

/// Feed `sink` until every frame is accepted, the sink refuses one, or
/// `cancel` fires. Returns how many frames were delivered by this call.
pub fn pump<S: FrameSink + ?Sized>(
    producer: &mut FrameProducer,
    sink: &mut S,
    cancel: &CancelToken,
) -> Result<usize> {
    let mut delivered = 0;

    loop {
        if cancel.is_cancelled() {
            info!(frame = producer.position(), delivered, "frame production cancelled");
            return Err(GrowthError::Cancelled {
                frame: producer.position(),
            });
        }

        match producer.offer(sink) {
            Ok(true) => delivered += 1,
            Ok(false) => {
                debug!(delivered, total = producer.total_frames(), "all frames delivered");
                return Ok(delivered);
            }
            Err(err) => {
                if err.is_recoverable() {
                    debug!(frame = producer.position(), "sink busy, holding frame");
                } else {
                    warn!(frame = producer.position(), error = %err, "sink refused frame");
                }
                return Err(err);
            }
        }
    }
}

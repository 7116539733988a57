//! Frame composition, rasterization and delivery

pub mod compositor;
pub mod surface;
pub mod pipeline;

pub use compositor::{compose, is_occluded, CompositeRule, DrawOp, DrawOrder, Frame, Layer, Occlusion};
pub use surface::{paint, DrawSurface, RasterSurface};
pub use pipeline::{pump, CancelToken, ChannelSink, FrameProducer, FrameSink, RenderedFrame};

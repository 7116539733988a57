//! Error types for plant generation and frame production.

use thiserror::Error;

/// Errors raised by a frame sink when it is handed a rendered frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The consumer has not drained the previous frame yet.
    #[error("sink is busy, retry after the consumer drains")]
    Busy,

    /// The consumer went away.
    #[error("sink is closed")]
    Closed,

    /// The consumer refused the frame outright.
    #[error("sink rejected frame: {0}")]
    Rejected(String),
}

impl SinkError {
    /// Whether the same frame can be offered again later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SinkError::Busy)
    }
}

/// Errors that can occur while generating, fitting or animating a plant.
#[derive(Debug, Error)]
pub enum GrowthError {
    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration text could not be parsed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Geometry input that would produce NaN or infinite output.
    #[error("invalid geometry: {what} = {value}")]
    InvalidGeometry {
        /// Which quantity was rejected.
        what: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Bounds with no extent cannot be scaled to a canvas.
    #[error("degenerate bounds: {width} x {height}")]
    DegenerateBounds {
        /// Bounds width.
        width: f64,
        /// Bounds height.
        height: f64,
    },

    /// The frame sink refused a frame.
    #[error("frame {frame} not accepted: {source}")]
    Sink {
        /// Index of the frame that was refused.
        frame: usize,
        /// Why the sink refused it.
        #[source]
        source: SinkError,
    },

    /// Production was cancelled before the given frame.
    #[error("cancelled before frame {frame}")]
    Cancelled {
        /// Index of the next frame that would have been produced.
        frame: usize,
    },
}

impl GrowthError {
    /// Whether the caller can retry the failed operation unchanged.
    pub fn is_recoverable(&self) -> bool {
        match self {
            GrowthError::Sink { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = GrowthError> = std::result::Result<T, E>;

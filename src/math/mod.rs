pub mod point;
pub mod color;
pub mod bounds;
pub mod bezier;

pub use point::Point;
pub use color::Color;
pub use bounds::Bounds;
pub use bezier::QuadBezier;

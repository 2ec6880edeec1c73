/// Geometry value types shared by canvases, actions and drawables.
pub mod core;
/// Error taxonomy.
pub mod error;

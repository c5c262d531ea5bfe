//! Rendering module
//!
//! Draws a read-only view of the game state onto a [`Canvas`]. The bundled
//! [`DrawList`] records commands and tessellates them into vertices.

pub mod canvas;
pub mod shapes;
pub mod vertex;

pub use canvas::{Canvas, DrawCommand, DrawList, camera_offset, draw_frame};
pub use vertex::{Color, Vertex, colors};

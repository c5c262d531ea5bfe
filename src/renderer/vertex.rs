//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// RGBA, each channel in [0, 1]
pub type Color = [f32; 4];

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Color,
}

impl Vertex {
    /// Bytes per vertex in a packed buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// View a vertex slice as raw bytes for upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
    /// #333
    pub const GRID: Color = [0.2, 0.2, 0.2, 1.0];
    pub const PLAYER: Color = [1.0, 1.0, 1.0, 1.0];
    pub const ENEMY: Color = [1.0, 0.0, 0.0, 1.0];
    pub const HEALTH_BAR_BACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const HEALTH_BAR_FILL: Color = [0.0, 0.5, 0.0, 1.0];
    pub const BULLET: Color = [1.0, 1.0, 0.0, 1.0];
    pub const JEWEL: Color = [0.0, 0.0, 1.0, 1.0];
    pub const TREE: Color = [0.0, 0.5, 0.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 6 * 4);
        let verts = [Vertex::new(1.0, 2.0, colors::PLAYER); 3];
        assert_eq!(as_bytes(&verts).len(), 3 * Vertex::STRIDE);
    }
}

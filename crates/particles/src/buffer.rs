//! Flat position buffer shared between a simulation and the renderer.

use glam::Vec3;

/// Interleaved `xyz` positions, one triple per point, in point index order.
///
/// The simulation is the only writer. The renderer reads the slice between
/// simulation steps and calls [`PositionBuffer::take_dirty`] to learn whether
/// it has to re-upload.
#[derive(Debug, Clone, Default)]
pub struct PositionBuffer {
    data: Vec<f32>,
    dirty: bool,
}

impl PositionBuffer {
    /// Buffer for `count` points, all at the origin, marked dirty.
    pub fn with_points(count: usize) -> Self {
        Self {
            data: vec![0.0; count * 3],
            dirty: true,
        }
    }

    /// Number of points (not floats) in the buffer.
    pub fn point_count(&self) -> usize {
        self.data.len() / 3
    }

    /// Overwrite the position of point `index`.
    pub fn write(&mut self, index: usize, position: Vec3) {
        let start = index * 3;
        self.data[start..start + 3].copy_from_slice(&position.to_array());
    }

    /// Position of point `index`.
    pub fn read(&self, index: usize) -> Vec3 {
        let start = index * 3;
        Vec3::from_slice(&self.data[start..start + 3])
    }

    /// Flag the contents as changed since the last upload.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the buffer changed since the last call, and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw bytes for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Drop the storage (capacity included). The buffer reads as empty afterwards.
    pub fn release(&mut self) {
        self.data = Vec::new();
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_point() {
        let mut buf = PositionBuffer::with_points(4);
        buf.write(2, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(buf.read(2), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(&buf.as_slice()[6..9], &[1.0, 2.0, 3.0]);
        assert_eq!(buf.as_bytes().len(), 4 * 3 * 4);
    }

    #[test]
    fn take_dirty_clears_flag() {
        let mut buf = PositionBuffer::with_points(1);
        assert!(buf.take_dirty());
        assert!(!buf.take_dirty());
        buf.mark_dirty();
        assert!(buf.is_dirty());
    }

    #[test]
    fn release_empties_buffer() {
        let mut buf = PositionBuffer::with_points(10);
        buf.release();
        assert_eq!(buf.point_count(), 0);
        assert!(buf.as_slice().is_empty());
        assert!(!buf.is_dirty());
    }
}

use crate::document::{AuxiliaryBuffers, EdgeTrim, MaterialOverride};

/// Fills the per-edge auxiliary arrays for a polygon of `vertex_count` vertices.
///
/// Every edge receives the same trim and side material.
pub struct BuildEdgeBuffers {
    vertex_count: usize,
    side_material: MaterialOverride,
    trim: EdgeTrim,
}

impl BuildEdgeBuffers {
    /// Creates a new `BuildEdgeBuffers` operation.
    #[must_use]
    pub fn new(vertex_count: usize, side_material: MaterialOverride, trim: EdgeTrim) -> Self {
        Self {
            vertex_count,
            side_material,
            trim,
        }
    }

    /// Allocates fresh buffers.
    #[must_use]
    pub fn execute(&self) -> AuxiliaryBuffers {
        let mut buffers = AuxiliaryBuffers::default();
        self.rebuild(&mut buffers);
        buffers
    }

    /// Discards whatever `buffers` held and refills it for this polygon.
    pub fn rebuild(&self, buffers: &mut AuxiliaryBuffers) {
        let len = self.vertex_count + 1;

        buffers.edge_trims.clear();
        buffers.edge_trims.resize(len, self.trim);
        buffers.edge_trims[0] = EdgeTrim::default();

        buffers.side_materials.clear();
        buffers.side_materials.resize(len, self.side_material);
        buffers.side_materials[0] = MaterialOverride::default();
    }
}

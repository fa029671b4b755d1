use std::collections::BTreeSet;
use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::geometry::PolygonMemo;
use crate::identifier::ElementId;

/// How a slab's layers are built up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StructureType {
    #[default]
    Basic,
    Composite,
    ComplexProfile,
}

/// Which face of the slab its level refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferencePlaneLocation {
    #[default]
    Top,
    CoreTop,
    CoreBottom,
    Bottom,
}

/// Trim applied to a slab edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeTrimKind {
    #[default]
    Vertical,
    Perpendicular,
    Horizontal,
    Custom,
    AlignWithCut,
}

/// Trim type and angle of one polygon edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeTrim {
    pub kind: EdgeTrimKind,
    /// Trim angle in radians.
    pub angle: f64,
}

impl EdgeTrim {
    /// The trim used when the input says nothing: perpendicular at 90°.
    pub const DEFAULT: Self = Self {
        kind: EdgeTrimKind::Perpendicular,
        angle: FRAC_PI_2,
    };
}

/// Material override reference for one slab side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaterialOverride {
    pub overridden: bool,
    pub material: u32,
}

/// Polygon header counts stored on the element record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolygonCounts {
    pub sub_polys: usize,
    pub coords: usize,
    pub arcs: usize,
}

/// Element-level attributes of a slab.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabRecord {
    pub id: ElementId,
    pub floor_index: i32,
    /// Level relative to the story at `floor_index`.
    pub level: f64,
    pub polygon: PolygonCounts,
    pub structure_type: StructureType,
    pub thickness: f64,
    pub reference_plane_location: ReferencePlaneLocation,
    pub side_material: MaterialOverride,
}

impl SlabRecord {
    /// Default slab settings for a new element with the given id.
    #[must_use]
    pub fn with_defaults(id: ElementId) -> Self {
        Self {
            id,
            floor_index: 0,
            level: 0.0,
            polygon: PolygonCounts::default(),
            structure_type: StructureType::default(),
            thickness: 0.3,
            reference_plane_location: ReferencePlaneLocation::default(),
            side_material: MaterialOverride::default(),
        }
    }
}

/// Record attributes a modify call may overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlabField {
    SubPolyCount,
    VertexCount,
    ArcCount,
    Level,
    FloorIndex,
    StructureType,
    Thickness,
    ReferencePlaneLocation,
}

/// Set of fields a modify call overwrites; everything else is left as is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeMask(BTreeSet<SlabField>);

impl ChangeMask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: SlabField) {
        self.0.insert(field);
    }

    #[must_use]
    pub fn contains(&self, field: SlabField) -> bool {
        self.0.contains(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SlabField> + '_ {
        self.0.iter().copied()
    }
}

/// Auxiliary element data replaced by a modify call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemoPart {
    Polygon,
    SideMaterials,
    EdgeTrims,
}

/// Set of auxiliary parts a modify call replaces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemoMask(BTreeSet<MemoPart>);

impl MemoMask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, part: MemoPart) {
        self.0.insert(part);
    }

    #[must_use]
    pub fn contains(&self, part: MemoPart) -> bool {
        self.0.contains(&part)
    }
}

/// Per-edge arrays sized `vertex_count + 1`.
///
/// Slot 0 is reserved and never exposed; slots `1..=vertex_count` follow
/// the polygon's edge numbering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuxiliaryBuffers {
    pub(crate) edge_trims: Vec<EdgeTrim>,
    pub(crate) side_materials: Vec<MaterialOverride>,
}

impl AuxiliaryBuffers {
    /// Number of edges the buffers were sized for.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.edge_trims.len().saturating_sub(1)
    }

    /// Allocated slots per array, including the reserved slot 0.
    #[must_use]
    pub fn allocated_len(&self) -> (usize, usize) {
        (self.edge_trims.len(), self.side_materials.len())
    }

    /// Trim of edge `index` (1-based).
    #[must_use]
    pub fn edge_trim(&self, index: usize) -> Option<&EdgeTrim> {
        if index == 0 {
            return None;
        }
        self.edge_trims.get(index)
    }

    /// Side material of edge `index` (1-based).
    #[must_use]
    pub fn side_material(&self, index: usize) -> Option<&MaterialOverride> {
        if index == 0 {
            return None;
        }
        self.side_materials.get(index)
    }

    /// Trims of edges `1..=vertex_count`.
    #[must_use]
    pub fn edge_trims(&self) -> &[EdgeTrim] {
        self.edge_trims.get(1..).unwrap_or(&[])
    }

    /// Side materials of edges `1..=vertex_count`.
    #[must_use]
    pub fn side_materials(&self) -> &[MaterialOverride] {
        self.side_materials.get(1..).unwrap_or(&[])
    }
}

/// Auxiliary data handed to the document alongside a [`SlabRecord`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlabMemo {
    /// Polygon buffers; `None` keeps the element's current geometry.
    pub polygon: Option<PolygonMemo>,
    pub buffers: AuxiliaryBuffers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_mask_tracks_only_set_fields() {
        let mut mask = ChangeMask::new();
        assert!(mask.is_empty());
        mask.set(SlabField::Thickness);
        mask.set(SlabField::Thickness);
        assert!(mask.contains(SlabField::Thickness));
        assert!(!mask.contains(SlabField::StructureType));
        assert_eq!(mask.iter().count(), 1);
    }

    #[test]
    fn empty_buffers_expose_nothing() {
        let buffers = AuxiliaryBuffers::default();
        assert_eq!(buffers.vertex_count(), 0);
        assert!(buffers.edge_trims().is_empty());
        assert!(buffers.side_materials().is_empty());
        assert!(buffers.edge_trim(1).is_none());
    }

    #[test]
    fn slot_zero_is_never_exposed() {
        let buffers = AuxiliaryBuffers {
            edge_trims: vec![EdgeTrim::default(), EdgeTrim::DEFAULT],
            side_materials: vec![MaterialOverride::default(); 2],
        };
        assert!(buffers.edge_trim(0).is_none());
        assert!(buffers.side_material(0).is_none());
        assert_eq!(buffers.edge_trim(1), Some(&EdgeTrim::DEFAULT));
        assert_eq!(buffers.edge_trims().len(), 1);
    }
}

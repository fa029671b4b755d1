use std::f64::consts::FRAC_PI_2;

use serde_json::Value;

use super::fields::{self, Fields};
use super::names::EnumTables;
use crate::document::{
    AuxiliaryBuffers, ChangeMask, DocumentModel, EdgeTrim, EdgeTrimKind, MemoMask, MemoPart,
    PolygonCounts, ReferencePlaneLocation, SlabField, SlabMemo, SlabRecord, StoryTable,
    StructureType,
};
use crate::error::Result;
use crate::geometry::{DecodeShape, DecodedShape, ExternalShape};
use crate::identifier::ElementId;

/// How an item's floor index and relative level are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorRule {
    /// Floor index given by the input; level is relative to that floor.
    ByFloorIndex(i32),
    /// Floor and level both come from the story nearest the elevation.
    ByNearestStory,
}

impl FloorRule {
    /// Returns `(floor_index, level)` for an absolute `elevation`.
    #[must_use]
    pub fn resolve(self, stories: &dyn StoryTable, elevation: f64) -> (i32, f64) {
        match self {
            Self::ByFloorIndex(floor) => (floor, stories.level_given_floor(elevation, floor)),
            Self::ByNearestStory => stories.floor_and_level(elevation),
        }
    }
}

/// Decoded intent of one input item.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabDescriptor {
    pub id: ElementId,
    /// `None` keeps the element's current geometry.
    pub shape: Option<DecodedShape>,
    pub floor_rule: FloorRule,
    pub floor_index: i32,
    pub level: f64,
    pub structure_type: Option<StructureType>,
    pub thickness: Option<f64>,
    pub reference_plane_location: Option<ReferencePlaneLocation>,
    /// Applied to every edge; never part of the change mask.
    pub edge_trim: EdgeTrim,
    /// Element data the descriptor is applied on top of.
    pub base: SlabRecord,
}

impl SlabDescriptor {
    /// The element record to hand to the document.
    #[must_use]
    pub fn record(&self) -> SlabRecord {
        let mut record = self.base.clone();
        record.id = self.id;
        record.floor_index = self.floor_index;
        record.level = self.level;
        if let Some(shape) = &self.shape {
            record.polygon = PolygonCounts {
                sub_polys: shape.sub_poly_count,
                coords: shape.vertex_count,
                arcs: shape.arc_count,
            };
        }
        if let Some(structure_type) = self.structure_type {
            record.structure_type = structure_type;
        }
        if let Some(thickness) = self.thickness {
            record.thickness = thickness;
        }
        if let Some(location) = self.reference_plane_location {
            record.reference_plane_location = location;
        }
        record
    }

    /// Number of edges the auxiliary buffers must cover.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.shape
            .as_ref()
            .map_or(self.base.polygon.coords, |s| s.vertex_count)
    }

    /// Auxiliary parts a modify call replaces.
    #[must_use]
    pub fn memo_mask(&self) -> MemoMask {
        let mut mask = MemoMask::new();
        if self.shape.is_some() {
            mask.set(MemoPart::Polygon);
        }
        mask.set(MemoPart::SideMaterials);
        mask.set(MemoPart::EdgeTrims);
        mask
    }

    /// Moves the polygon payload into a fresh memo.
    #[must_use]
    pub fn take_memo(&mut self) -> SlabMemo {
        SlabMemo {
            polygon: self.shape.as_mut().map(|s| std::mem::take(&mut s.memo)),
            buffers: AuxiliaryBuffers::default(),
        }
    }
}

/// Decodes one external item into a [`SlabDescriptor`] and its [`ChangeMask`].
pub struct SlabDescriptorBuilder<'a> {
    tables: &'a EnumTables,
}

impl<'a> SlabDescriptorBuilder<'a> {
    #[must_use]
    pub fn new(tables: &'a EnumTables) -> Self {
        Self { tables }
    }

    /// Builds the descriptor for `item` against the current `document`.
    ///
    /// An absent identifier yields a fresh one, so the item is created.
    ///
    /// # Errors
    ///
    /// Returns a validation, decode or geometry error; no partial descriptor
    /// is produced.
    pub fn build<D>(&self, item: &Value, document: &D) -> Result<(SlabDescriptor, ChangeMask)>
    where
        D: DocumentModel + ?Sized,
    {
        let item = fields::as_fields(item)?;
        let mut mask = ChangeMask::new();

        let id = match fields::get_optional::<String>(item, fields::ELEMENT_ID)? {
            Some(text) => ElementId::parse(&text)?,
            None => ElementId::new_v4(),
        };
        let base = document.base_record(id);

        let shape = match fields::get_optional::<ExternalShape>(item, fields::SHAPE)? {
            Some(external) => {
                let decoded = DecodeShape::new(&external).execute()?;
                mask.set(SlabField::SubPolyCount);
                mask.set(SlabField::VertexCount);
                mask.set(SlabField::ArcCount);
                Some(decoded)
            }
            None => None,
        };

        let floor_rule = match fields::get_optional::<i32>(item, fields::FLOOR_INDEX)? {
            Some(floor) => FloorRule::ByFloorIndex(floor),
            None => FloorRule::ByNearestStory,
        };
        let stories = document.stories();
        let elevation = shape.as_ref().map_or_else(
            || stories.story_level(base.floor_index).unwrap_or(0.0) + base.level,
            |s| s.level,
        );
        let (floor_index, level) = floor_rule.resolve(stories, elevation);
        if shape.is_some() || matches!(floor_rule, FloorRule::ByFloorIndex(_)) {
            mask.set(SlabField::Level);
            mask.set(SlabField::FloorIndex);
        }
        tracing::debug!(%id, ?floor_rule, floor_index, level, "resolved slab placement");

        let structure_type = self.resolve_structure(item, &mut mask)?;
        let thickness = fields::get_optional::<f64>(item, fields::THICKNESS)?;
        if thickness.is_some() {
            mask.set(SlabField::Thickness);
        }
        let reference_plane_location = self.resolve_reference_plane(item, &mut mask)?;
        let edge_trim = self.resolve_edge_trim(item)?;

        let descriptor = SlabDescriptor {
            id,
            shape,
            floor_rule,
            floor_index,
            level,
            structure_type,
            thickness,
            reference_plane_location,
            edge_trim,
            base,
        };
        Ok((descriptor, mask))
    }

    fn resolve_structure(
        &self,
        item: &Fields,
        mask: &mut ChangeMask,
    ) -> Result<Option<StructureType>> {
        let Some(name) = fields::get_optional::<String>(item, fields::STRUCTURE)? else {
            return Ok(None);
        };
        let resolved = self.tables.structure_types.resolve(&name);
        match resolved {
            Some(_) => mask.set(SlabField::StructureType),
            None => tracing::debug!(name = %name, "unmapped structure type left unset"),
        }
        Ok(resolved)
    }

    fn resolve_reference_plane(
        &self,
        item: &Fields,
        mask: &mut ChangeMask,
    ) -> Result<Option<ReferencePlaneLocation>> {
        let Some(name) = fields::get_optional::<String>(item, fields::REFERENCE_PLANE_LOCATION)?
        else {
            return Ok(None);
        };
        let resolved = self.tables.reference_plane_locations.resolve(&name);
        match resolved {
            Some(_) => mask.set(SlabField::ReferencePlaneLocation),
            None => tracing::debug!(name = %name, "unmapped reference plane location left unset"),
        }
        Ok(resolved)
    }

    fn resolve_edge_trim(&self, item: &Fields) -> Result<EdgeTrim> {
        let kind = fields::get_optional::<String>(item, fields::EDGE_ANGLE_TYPE)?
            .and_then(|name| self.tables.edge_angle_types.resolve(&name))
            .unwrap_or(EdgeTrimKind::Perpendicular);
        let angle = fields::get_optional::<f64>(item, fields::EDGE_ANGLE)?.unwrap_or(FRAC_PI_2);
        Ok(EdgeTrim { kind, angle })
    }
}

use std::collections::HashMap;

use slotmap::SlotMap;

use super::record::{
    AuxiliaryBuffers, ChangeMask, MemoMask, MemoPart, SlabField, SlabMemo, SlabRecord,
};
use super::story::Stories;
use super::{DocumentModel, StoryTable};
use crate::error::{MutationError, TransactionError};
use crate::geometry::PolygonMemo;
use crate::identifier::ElementId;

slotmap::new_key_type! {
    /// Internal handle of a slab in the document arena.
    pub struct SlabKey;
}

/// A slab as persisted in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSlab {
    pub record: SlabRecord,
    pub polygon: PolygonMemo,
    pub buffers: AuxiliaryBuffers,
}

/// In-memory document model.
///
/// Elements live in an arena keyed by internal handles; the textual
/// element id resolves to a handle through a side index.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    slabs: SlotMap<SlabKey, StoredSlab>,
    index: HashMap<ElementId, SlabKey>,
    stories: Stories,
    defaults: Option<SlabRecord>,
    active_transaction: Option<String>,
    committed: Vec<String>,
    read_only: bool,
}

impl MemoryDocument {
    /// Creates an empty document with a single ground story.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document with the given story table.
    #[must_use]
    pub fn with_stories(stories: Stories) -> Self {
        Self {
            stories,
            ..Self::default()
        }
    }

    /// Replaces the default settings used for new slabs.
    pub fn set_defaults(&mut self, defaults: SlabRecord) {
        self.defaults = Some(defaults);
    }

    /// Makes the document refuse to open transactions.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Returns the stored slab for `id`.
    #[must_use]
    pub fn slab(&self, id: ElementId) -> Option<&StoredSlab> {
        self.index.get(&id).and_then(|key| self.slabs.get(*key))
    }

    /// Number of slabs in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slabs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slabs.is_empty()
    }

    /// Names of committed transactions, oldest first.
    #[must_use]
    pub fn committed_transactions(&self) -> &[String] {
        &self.committed
    }

    fn require_transaction(&self) -> Result<(), MutationError> {
        if self.active_transaction.is_none() {
            return Err(MutationError::NoActiveTransaction);
        }
        Ok(())
    }

    fn validate(
        &self,
        record: &SlabRecord,
        polygon: &PolygonMemo,
        buffers: &AuxiliaryBuffers,
    ) -> Result<(), MutationError> {
        if record.thickness.is_nan() || record.thickness <= 0.0 {
            return Err(MutationError::InvalidThickness(record.thickness));
        }
        if self.stories.story_level(record.floor_index).is_none() {
            return Err(MutationError::UnknownFloor(record.floor_index));
        }

        let vertex_count = record.polygon.coords;
        check_len("polygon", vertex_count, polygon.coords.len())?;
        let (trims, materials) = buffers.allocated_len();
        check_len("edge trim", vertex_count + 1, trims)?;
        check_len("side material", vertex_count + 1, materials)?;
        Ok(())
    }
}

fn check_len(buffer: &'static str, expected: usize, actual: usize) -> Result<(), MutationError> {
    if expected != actual {
        return Err(MutationError::BufferSizeMismatch {
            buffer,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Copies the masked fields of `source` onto `target`.
fn apply_mask(target: &mut SlabRecord, source: &SlabRecord, mask: &ChangeMask) {
    for field in mask.iter() {
        match field {
            SlabField::SubPolyCount => target.polygon.sub_polys = source.polygon.sub_polys,
            SlabField::VertexCount => target.polygon.coords = source.polygon.coords,
            SlabField::ArcCount => target.polygon.arcs = source.polygon.arcs,
            SlabField::Level => target.level = source.level,
            SlabField::FloorIndex => target.floor_index = source.floor_index,
            SlabField::StructureType => target.structure_type = source.structure_type,
            SlabField::Thickness => target.thickness = source.thickness,
            SlabField::ReferencePlaneLocation => {
                target.reference_plane_location = source.reference_plane_location;
            }
        }
    }
}

impl DocumentModel for MemoryDocument {
    fn stories(&self) -> &dyn StoryTable {
        &self.stories
    }

    fn element_exists(&self, id: ElementId) -> bool {
        self.index.contains_key(&id)
    }

    fn base_record(&self, id: ElementId) -> SlabRecord {
        if let Some(stored) = self.slab(id) {
            return stored.record.clone();
        }
        let mut record = self
            .defaults
            .clone()
            .unwrap_or_else(|| SlabRecord::with_defaults(id));
        record.id = id;
        record
    }

    fn create_element(
        &mut self,
        record: &SlabRecord,
        memo: &SlabMemo,
    ) -> Result<ElementId, MutationError> {
        self.require_transaction()?;
        if self.element_exists(record.id) {
            return Err(MutationError::AlreadyExists(record.id.to_string()));
        }
        let polygon = memo.polygon.as_ref().ok_or(MutationError::MissingGeometry)?;
        self.validate(record, polygon, &memo.buffers)?;

        let key = self.slabs.insert(StoredSlab {
            record: record.clone(),
            polygon: polygon.clone(),
            buffers: memo.buffers.clone(),
        });
        self.index.insert(record.id, key);
        Ok(record.id)
    }

    fn change_element(
        &mut self,
        record: &SlabRecord,
        mask: &ChangeMask,
        memo: &SlabMemo,
        memo_mask: &MemoMask,
    ) -> Result<ElementId, MutationError> {
        self.require_transaction()?;
        let key = *self
            .index
            .get(&record.id)
            .ok_or_else(|| MutationError::NotFound(record.id.to_string()))?;
        let stored = self
            .slabs
            .get(key)
            .ok_or_else(|| MutationError::NotFound(record.id.to_string()))?;

        let mut updated = stored.clone();
        apply_mask(&mut updated.record, record, mask);
        if memo_mask.contains(MemoPart::Polygon) {
            let polygon = memo.polygon.as_ref().ok_or(MutationError::MissingGeometry)?;
            updated.polygon = polygon.clone();
        }
        if memo_mask.contains(MemoPart::EdgeTrims) {
            updated.buffers.edge_trims.clone_from(&memo.buffers.edge_trims);
        }
        if memo_mask.contains(MemoPart::SideMaterials) {
            updated
                .buffers
                .side_materials
                .clone_from(&memo.buffers.side_materials);
        }
        self.validate(&updated.record, &updated.polygon, &updated.buffers)?;

        if let Some(slot) = self.slabs.get_mut(key) {
            *slot = updated;
        }
        Ok(record.id)
    }

    fn run_as_transaction<T, F>(&mut self, name: &str, f: F) -> Result<T, TransactionError>
    where
        F: FnOnce(&mut Self) -> T,
    {
        if self.read_only {
            return Err(TransactionError::ReadOnly);
        }
        if let Some(active) = &self.active_transaction {
            return Err(TransactionError::Nested(active.clone()));
        }

        self.active_transaction = Some(name.to_owned());
        let output = f(self);
        self.active_transaction = None;
        self.committed.push(name.to_owned());
        Ok(output)
    }
}

pub mod memory;
pub mod record;
pub mod story;

pub use memory::{MemoryDocument, SlabKey, StoredSlab};
pub use record::{
    AuxiliaryBuffers, ChangeMask, EdgeTrim, EdgeTrimKind, MaterialOverride, MemoMask, MemoPart,
    PolygonCounts, ReferencePlaneLocation, SlabField, SlabMemo, SlabRecord, StructureType,
};
pub use story::{Stories, Story};

use crate::error::{MutationError, TransactionError};
use crate::identifier::ElementId;

/// Vertical placement policy of the host document.
pub trait StoryTable {
    /// Absolute elevation of the story at `floor_index`, if it exists.
    fn story_level(&self, floor_index: i32) -> Option<f64>;

    /// Level of `elevation` relative to the given floor.
    fn level_given_floor(&self, elevation: f64, floor_index: i32) -> f64;

    /// Nearest story for `elevation` and the level relative to it.
    fn floor_and_level(&self, elevation: f64) -> (i32, f64);
}

/// The host document model the slab command mutates.
///
/// Mutations are only valid inside [`DocumentModel::run_as_transaction`].
/// A failed mutation must leave the document exactly as it was.
pub trait DocumentModel {
    /// The document's story table.
    fn stories(&self) -> &dyn StoryTable;

    /// Returns `true` if `id` names a live element. Never mutates.
    fn element_exists(&self, id: ElementId) -> bool;

    /// Current data of element `id`, or the default slab settings when it
    /// does not exist yet.
    fn base_record(&self, id: ElementId) -> SlabRecord;

    /// Creates a new slab.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] if the document rejects the element.
    fn create_element(
        &mut self,
        record: &SlabRecord,
        memo: &SlabMemo,
    ) -> Result<ElementId, MutationError>;

    /// Overwrites the masked fields and memo parts of an existing slab.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] if the document rejects the change.
    fn change_element(
        &mut self,
        record: &SlabRecord,
        mask: &ChangeMask,
        memo: &SlabMemo,
        memo_mask: &MemoMask,
    ) -> Result<ElementId, MutationError>;

    /// Runs `f` as one named, undoable unit of work and commits it.
    ///
    /// # Errors
    ///
    /// Returns a [`TransactionError`] if the transaction cannot be opened;
    /// `f` is not called in that case.
    fn run_as_transaction<T, F>(&mut self, name: &str, f: F) -> Result<T, TransactionError>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> T;
}

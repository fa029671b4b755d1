use crate::document::{ChangeMask, DocumentModel, MemoMask, SlabMemo, SlabRecord};
use crate::error::MutationError;
use crate::identifier::ElementId;

/// Which document call an item maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Modify,
}

/// Decides create vs. modify for `id`. Read-only.
#[must_use]
pub fn resolve_mutation<D>(document: &D, id: ElementId) -> Mutation
where
    D: DocumentModel + ?Sized,
{
    if document.element_exists(id) {
        Mutation::Modify
    } else {
        Mutation::Create
    }
}

/// Writes one fully prepared slab to the document.
pub struct MutateElement<'a> {
    record: &'a SlabRecord,
    mask: &'a ChangeMask,
    memo: &'a SlabMemo,
    memo_mask: &'a MemoMask,
}

impl<'a> MutateElement<'a> {
    /// Creates a new `MutateElement` operation.
    #[must_use]
    pub fn new(
        record: &'a SlabRecord,
        mask: &'a ChangeMask,
        memo: &'a SlabMemo,
        memo_mask: &'a MemoMask,
    ) -> Self {
        Self {
            record,
            mask,
            memo,
            memo_mask,
        }
    }

    /// Executes `mutation` against `document`.
    ///
    /// The change and memo masks only apply to [`Mutation::Modify`].
    ///
    /// # Errors
    ///
    /// Returns the document's [`MutationError`] unchanged.
    pub fn execute<D>(
        &self,
        document: &mut D,
        mutation: Mutation,
    ) -> Result<ElementId, MutationError>
    where
        D: DocumentModel + ?Sized,
    {
        match mutation {
            Mutation::Create => document.create_element(self.record, self.memo),
            Mutation::Modify => {
                document.change_element(self.record, self.mask, self.memo, self.memo_mask)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::edge_buffers::BuildEdgeBuffers;
    use crate::document::{EdgeTrim, MemoryDocument, PolygonCounts, SlabField};
    use crate::geometry::PolygonMemo;
    use crate::math::Point2;

    fn triangle() -> (SlabRecord, SlabMemo) {
        let mut record = SlabRecord::with_defaults(ElementId::new_v4());
        record.polygon = PolygonCounts {
            sub_polys: 1,
            coords: 4,
            arcs: 0,
        };
        let memo = SlabMemo {
            polygon: Some(PolygonMemo {
                coords: vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(1.0, 0.0),
                    Point2::new(0.0, 1.0),
                    Point2::new(0.0, 0.0),
                ],
                sub_poly_ends: vec![4],
                arcs: vec![],
            }),
            buffers: BuildEdgeBuffers::new(4, record.side_material, EdgeTrim::DEFAULT).execute(),
        };
        (record, memo)
    }

    #[test]
    fn unknown_id_resolves_to_create_then_modify() {
        let mut doc = MemoryDocument::new();
        let (record, memo) = triangle();
        assert_eq!(resolve_mutation(&doc, record.id), Mutation::Create);

        let mask = ChangeMask::new();
        let memo_mask = MemoMask::new();
        let op = MutateElement::new(&record, &mask, &memo, &memo_mask);
        doc.run_as_transaction("t", |d| op.execute(d, Mutation::Create))
            .unwrap()
            .unwrap();
        assert_eq!(resolve_mutation(&doc, record.id), Mutation::Modify);
    }

    #[test]
    fn modify_honours_the_mask() {
        let mut doc = MemoryDocument::new();
        let (record, memo) = triangle();
        let mut thicker = record.clone();
        thicker.thickness = 1.0;
        thicker.level = 7.0;
        let mut mask = ChangeMask::new();
        mask.set(SlabField::Thickness);
        let memo_mask = MemoMask::new();

        doc.run_as_transaction("t", |d| {
            MutateElement::new(&record, &ChangeMask::new(), &memo, &memo_mask)
                .execute(d, Mutation::Create)?;
            MutateElement::new(&thicker, &mask, &memo, &memo_mask).execute(d, Mutation::Modify)
        })
        .unwrap()
        .unwrap();

        let stored = doc.slab(record.id).unwrap();
        assert!((stored.record.thickness - 1.0).abs() < 1e-12);
        assert!(stored.record.level.abs() < 1e-12);
    }

    #[test]
    fn modify_of_missing_element_fails() {
        let mut doc = MemoryDocument::new();
        let (record, memo) = triangle();
        let mask = ChangeMask::new();
        let memo_mask = MemoMask::new();
        let result = doc
            .run_as_transaction("t", |d| {
                MutateElement::new(&record, &mask, &memo, &memo_mask).execute(d, Mutation::Modify)
            })
            .unwrap();
        assert!(matches!(result, Err(MutationError::NotFound(_))));
    }
}

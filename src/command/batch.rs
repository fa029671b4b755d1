use serde_json::{Map, Value};

use super::config::CommandConfig;
use super::descriptor::SlabDescriptorBuilder;
use super::edge_buffers::BuildEdgeBuffers;
use super::fields;
use super::mutate::{resolve_mutation, MutateElement, Mutation};
use crate::document::DocumentModel;
use crate::error::{Result, SlabportError, TransactionError};
use crate::identifier::ElementId;

/// Why one item of a batch was skipped.
#[derive(Debug)]
pub struct ItemFailure {
    /// Position of the item in the input.
    pub index: usize,
    pub error: SlabportError,
}

/// Outcome of a batch.
///
/// Only `element_ids` reaches the output document; failures stay in-process.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Ids of the created or modified slabs, in input order.
    pub element_ids: Vec<ElementId>,
    pub failures: Vec<ItemFailure>,
}

impl BatchResult {
    /// The output document: `{ "elementIds": [...] }`.
    #[must_use]
    pub fn to_document(&self) -> Value {
        let ids: Vec<String> = self.element_ids.iter().map(ToString::to_string).collect();
        let mut doc = Map::new();
        doc.insert(fields::ELEMENT_IDS.to_owned(), Value::from(ids));
        Value::Object(doc)
    }
}

/// Runs a batch of slab items inside one document transaction.
pub struct BatchExecutor<'a> {
    config: &'a CommandConfig,
}

impl<'a> BatchExecutor<'a> {
    #[must_use]
    pub fn new(config: &'a CommandConfig) -> Self {
        Self { config }
    }

    /// Processes `items` in order and commits once.
    ///
    /// Item failures are recorded and skipped; they never abort the batch
    /// or roll back earlier items.
    ///
    /// # Errors
    ///
    /// Returns a [`TransactionError`] if the transaction cannot be opened,
    /// in which case no item is processed.
    pub fn execute<D: DocumentModel>(
        &self,
        document: &mut D,
        items: &[Value],
    ) -> std::result::Result<BatchResult, TransactionError> {
        let name = self.config.transaction_name.as_str();
        let span = tracing::info_span!("slab_batch", transaction = name, items = items.len());
        let _guard = span.enter();

        let result = document.run_as_transaction(name, |doc| {
            let mut result = BatchResult::default();
            for (index, item) in items.iter().enumerate() {
                match self.process_item(doc, item) {
                    Ok((id, mutation)) => {
                        tracing::debug!(index, %id, ?mutation, "slab written");
                        result.element_ids.push(id);
                    }
                    Err(error) => {
                        tracing::warn!(index, %error, "slab item skipped");
                        result.failures.push(ItemFailure { index, error });
                    }
                }
            }
            result
        })?;

        tracing::info!(
            written = result.element_ids.len(),
            skipped = result.failures.len(),
            "slab batch committed"
        );
        Ok(result)
    }

    fn process_item<D: DocumentModel>(
        &self,
        document: &mut D,
        item: &Value,
    ) -> Result<(ElementId, Mutation)> {
        let builder = SlabDescriptorBuilder::new(&self.config.tables);
        let (mut descriptor, mask) = builder.build(item, &*document)?;

        let record = descriptor.record();
        let memo_mask = descriptor.memo_mask();
        let mut memo = descriptor.take_memo();
        BuildEdgeBuffers::new(
            descriptor.vertex_count(),
            record.side_material,
            descriptor.edge_trim,
        )
        .rebuild(&mut memo.buffers);

        let mutation = resolve_mutation(&*document, descriptor.id);
        let id =
            MutateElement::new(&record, &mask, &memo, &memo_mask).execute(document, mutation)?;
        Ok((id, mutation))
    }
}

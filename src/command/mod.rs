pub mod batch;
pub mod config;
pub mod descriptor;
pub mod edge_buffers;
pub mod fields;
pub mod mutate;
pub mod names;

pub use batch::{BatchExecutor, BatchResult, ItemFailure};
pub use config::CommandConfig;
pub use descriptor::{FloorRule, SlabDescriptor, SlabDescriptorBuilder};
pub use edge_buffers::BuildEdgeBuffers;
pub use mutate::{resolve_mutation, MutateElement, Mutation};
pub use names::{EnumTables, NameTable};

use serde_json::Value;

use crate::document::DocumentModel;
use crate::error::Result;

/// Where the host must schedule a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPolicy {
    /// On the document's mutation thread; never concurrently with other writes.
    MainThread,
}

/// A named command the host dispatches JSON parameters to.
pub trait Command<D: DocumentModel> {
    fn namespace(&self) -> &str;

    fn name(&self) -> &str;

    fn execution_policy(&self) -> ExecutionPolicy {
        ExecutionPolicy::MainThread
    }

    /// Runs the command and returns its response document.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails as a whole.
    fn execute(&self, document: &mut D, parameters: &Value) -> Result<Value>;
}

/// Creates or updates a batch of slabs: `{ "slabs": [...] }` in,
/// `{ "elementIds": [...] }` out.
#[derive(Debug, Clone, Default)]
pub struct CreateSlab {
    config: CommandConfig,
}

impl CreateSlab {
    #[must_use]
    pub fn new(config: CommandConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &CommandConfig {
        &self.config
    }

    /// Runs the batch and keeps per-item failures for the caller.
    ///
    /// # Errors
    ///
    /// Fails before any item is processed if `parameters` has no `slabs`
    /// array, or if the transaction cannot be opened.
    pub fn run<D: DocumentModel>(
        &self,
        document: &mut D,
        parameters: &Value,
    ) -> Result<BatchResult> {
        let parameters = fields::as_fields(parameters)?;
        let slabs: Vec<Value> = fields::get(parameters, fields::SLABS)?;
        let result = BatchExecutor::new(&self.config).execute(document, &slabs)?;
        Ok(result)
    }
}

impl<D: DocumentModel> Command<D> for CreateSlab {
    fn namespace(&self) -> &str {
        "slabport"
    }

    fn name(&self) -> &str {
        "CreateSlab"
    }

    fn execute(&self, document: &mut D, parameters: &Value) -> Result<Value> {
        Ok(self.run(document, parameters)?.to_document())
    }
}

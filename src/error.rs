use thiserror::Error;

/// Top-level error type for the slab command pipeline.
///
/// Every family except [`TransactionError`] is item-scoped: the batch
/// executor catches it at the item boundary and moves on.
#[derive(Debug, Error)]
pub enum SlabportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// A required field is missing or malformed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("malformed element identifier: {0:?}")]
    MalformedIdentifier(String),
}

/// A field is present but does not have the expected shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("field `{field}` is not a valid {expected}: {source}")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a JSON object")]
    NotAnObject,

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[source] serde_json::Error),
}

/// The polygon description is structurally inconsistent.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("polyline has no segments")]
    EmptyPolyline,

    #[error("polyline has {0} segments, at least 3 required")]
    TooFewSegments(usize),

    #[error("segment {index} does not start where the previous one ends")]
    DisconnectedSegments { index: usize },

    #[error("polyline is not closed")]
    OpenPolyline,

    #[error("non-finite coordinate or arc angle")]
    NonFiniteValue,

    #[error("contour encloses no area")]
    DegenerateContour,

    #[error("polygon count {0} exceeds the representable range")]
    CountOverflow(usize),
}

/// The document model rejected a write.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("no transaction is active")]
    NoActiveTransaction,

    #[error("element {0} already exists")]
    AlreadyExists(String),

    #[error("element {0} not found")]
    NotFound(String),

    #[error("a new slab requires a shape")]
    MissingGeometry,

    #[error("thickness must be positive, got {0}")]
    InvalidThickness(f64),

    #[error("floor index {0} does not name a story")]
    UnknownFloor(i32),

    #[error("{buffer} buffer has {actual} entries, expected {expected}")]
    BufferSizeMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// The batch-level transaction could not be run.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("document is read-only")]
    ReadOnly,

    #[error("transaction {0:?} is already active")]
    Nested(String),
}

/// Convenience type alias for results using [`SlabportError`].
pub type Result<T> = std::result::Result<T, SlabportError>;

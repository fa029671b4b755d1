pub mod shape;

pub use shape::{
    DecodeShape, DecodedShape, ExternalPoint, ExternalPolyline, ExternalSegment, ExternalShape,
    PolyArc, PolygonMemo,
};

//! Name tables mapping external enumeration strings to domain values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::{EdgeTrimKind, ReferencePlaneLocation, StructureType};

/// Dictionary from external names to domain values.
///
/// Lookup is exact and case-sensitive. Unknown names resolve to `None`;
/// what that means is the caller's decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameTable<T>(HashMap<String, T>);

impl<T: Copy> NameTable<T> {
    /// Looks up `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<T> {
        self.0.get(name).copied()
    }
}

impl<T> NameTable<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T, S: Into<String>> FromIterator<(S, T)> for NameTable<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// The name tables the slab command consults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnumTables {
    pub structure_types: NameTable<StructureType>,
    pub reference_plane_locations: NameTable<ReferencePlaneLocation>,
    pub edge_angle_types: NameTable<EdgeTrimKind>,
}

impl Default for EnumTables {
    /// The host's display names.
    fn default() -> Self {
        Self {
            structure_types: [
                ("Basic", StructureType::Basic),
                ("Composite", StructureType::Composite),
                ("Complex Profile", StructureType::ComplexProfile),
            ]
            .into_iter()
            .collect(),
            reference_plane_locations: [
                ("Top", ReferencePlaneLocation::Top),
                ("Core Top", ReferencePlaneLocation::CoreTop),
                ("Core Bottom", ReferencePlaneLocation::CoreBottom),
                ("Bottom", ReferencePlaneLocation::Bottom),
            ]
            .into_iter()
            .collect(),
            edge_angle_types: [
                ("Vertical", EdgeTrimKind::Vertical),
                ("Perpendicular", EdgeTrimKind::Perpendicular),
                ("Horizontal", EdgeTrimKind::Horizontal),
                ("Custom", EdgeTrimKind::Custom),
                ("Align with Cut", EdgeTrimKind::AlignWithCut),
            ]
            .into_iter()
            .collect(),
        }
    }
}

use crate::record::{Structure, TowerAttributes};
use geo::geometry::Coord;
use std::collections::{hash_map::Entry, HashMap};

/// Structures keyed by SAP code.
///
/// When a code appears more than once the first row wins, matching
/// how the registry exports are read elsewhere.
#[derive(Debug, Default)]
pub struct StructureIndex<'a> {
    by_code: HashMap<&'a str, &'a Structure>,
}

impl<'a> StructureIndex<'a> {
    pub fn new<I>(structures: I) -> Self
    where
        I: IntoIterator<Item = &'a Structure>,
    {
        let mut by_code = HashMap::new();
        for structure in structures {
            if let Entry::Vacant(e) = by_code.entry(structure.code.as_str()) {
                e.insert(structure);
            }
        }
        Self { by_code }
    }

    pub fn get(&self, code: &str) -> Option<&'a Structure> {
        self.by_code.get(code).copied()
    }

    /// Returns the location of the structure with `code`, if it
    /// exists and has one.
    pub fn locate(&self, code: &str) -> Option<Coord<f64>> {
        self.get(code).and_then(Structure::coord)
    }

    pub fn attributes(&self, code: &str) -> Option<&'a TowerAttributes> {
        self.get(code).map(|structure| &structure.attributes)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::StructureIndex;
    use crate::record::{Structure, TowerAttributes};
    use geo::coord;

    fn structure(code: &str, lat: Option<f64>, lon: Option<f64>) -> Structure {
        Structure {
            code: code.into(),
            line_code: "LT-01".into(),
            lat,
            lon,
            altitude_m: None,
            attributes: TowerAttributes {
                sequence_id: Some(code.to_lowercase()),
                ..TowerAttributes::default()
            },
        }
    }

    #[test]
    fn test_first_row_wins() {
        let structures = [
            structure("TW-1", Some(-20.0), Some(-44.0)),
            structure("TW-1", Some(-21.0), Some(-45.0)),
            structure("TW-2", None, Some(-45.0)),
        ];
        let index = StructureIndex::new(&structures);
        assert_eq!(index.len(), 2);
        assert_eq!(index.locate("TW-1"), Some(coord!(x: -44.0, y: -20.0)));
        assert_eq!(index.locate("TW-2"), None);
        assert!(index.get("TW-2").is_some());
        assert_eq!(index.locate("TW-3"), None);
        assert_eq!(
            index.attributes("TW-2").and_then(|a| a.sequence_id.as_deref()),
            Some("tw-2")
        );
        assert!(index.attributes("TW-3").is_none());
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type PointId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Frontend,
    Backend,
    #[serde(rename = "AI")]
    Ai,
    Web3,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Frontend,
        Category::Backend,
        Category::Ai,
        Category::Web3,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Frontend => "Frontend",
            Category::Backend => "Backend",
            Category::Ai => "AI",
            Category::Web3 => "Web3",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A plotted location. Only `lat`, `lng`, `value` and `category` affect geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub id: PointId,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub label: String,
    pub lat: f32,
    pub lng: f32,
    pub value: f32,
    pub category: Category,
    #[serde(default)]
    pub developers: u32,
    #[serde(default)]
    pub commits: u32,
    #[serde(default)]
    pub startups: u32,
    /// Percentage change
    #[serde(default)]
    pub trend: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arc {
    pub from: PointId,
    pub to: PointId,
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("point id {0} appears more than once")]
    DuplicatePoint(PointId),
    #[error("point {id} has latitude {lat} / longitude {lng} outside the valid range")]
    OutOfRange { id: PointId, lat: f32, lng: f32 },
    #[error("arc #{arc} references unknown point id {id}")]
    UnknownPoint { arc: usize, id: PointId },
}

/// Immutable set of points and the arcs between them.
///
/// Deserializing goes through [`Dataset::new`], so a deserialized dataset is
/// validated and indexed like any other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    pub points: Vec<GeoPoint>,
    #[serde(default)]
    pub arcs: Vec<Arc>,
    #[serde(skip)]
    index: HashMap<PointId, usize>,
}

/// Dataset file contents before validation.
#[derive(Deserialize)]
struct RawDataset {
    points: Vec<GeoPoint>,
    #[serde(default)]
    arcs: Vec<Arc>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = DatasetError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        Self::new(raw.points, raw.arcs)
    }
}

impl Dataset {
    pub fn new(points: Vec<GeoPoint>, arcs: Vec<Arc>) -> Result<Self, DatasetError> {
        let mut dataset = Self {
            points,
            arcs,
            index: HashMap::new(),
        };
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DatasetError> {
        // parse and validate separately so validation keeps its own error variant
        let raw: RawDataset = toml::from_str(content)?;
        Self::try_from(raw)
    }

    /// Check the data-boundary invariants and rebuild the id index.
    pub fn validate(&mut self) -> Result<(), DatasetError> {
        self.index.clear();
        for (i, point) in self.points.iter().enumerate() {
            if !(-90.0..=90.0).contains(&point.lat) || !(-180.0..=180.0).contains(&point.lng) {
                return Err(DatasetError::OutOfRange {
                    id: point.id,
                    lat: point.lat,
                    lng: point.lng,
                });
            }
            if self.index.insert(point.id, i).is_some() {
                return Err(DatasetError::DuplicatePoint(point.id));
            }
        }
        for (arc_idx, arc) in self.arcs.iter().enumerate() {
            for id in [arc.from, arc.to] {
                if !self.index.contains_key(&id) {
                    return Err(DatasetError::UnknownPoint { arc: arc_idx, id });
                }
            }
        }
        Ok(())
    }

    pub fn point(&self, id: PointId) -> Option<&GeoPoint> {
        self.index.get(&id).map(|&i| &self.points[i])
    }

    /// Both endpoints of an arc. Only `None` for a dataset that skipped validation.
    pub fn endpoints(&self, arc: &Arc) -> Option<(&GeoPoint, &GeoPoint)> {
        Some((self.point(arc.from)?, self.point(arc.to)?))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::point;
    use super::*;

    #[test]
    fn deserialized_dataset_is_indexed() {
        let dataset: Dataset = toml::from_str(
            r#"
            [[points]]
            id = 7
            city = "Lagos"
            country = "Nigeria"
            lat = 6.52
            lng = 3.38
            value = 55.0
            category = "Frontend"
            "#,
        )
        .unwrap();

        assert_eq!(dataset.point(7).map(|p| p.city.as_str()), Some("Lagos"));
        assert!(dataset.arcs.is_empty());
    }

    #[test]
    fn deserializing_runs_validation() {
        let result: Result<Dataset, _> = toml::from_str(
            r#"
            [[points]]
            id = 1
            city = "Nowhere"
            country = "None"
            lat = 91.0
            lng = 0.0
            value = 1.0
            category = "AI"
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn parses_points_and_arcs_from_toml() {
        let content = r#"
            [[points]]
            id = 0
            city = "San Francisco"
            country = "USA"
            lat = 37.77
            lng = -122.42
            value = 98.0
            category = "AI"

            [[points]]
            id = 4
            city = "Tokyo"
            country = "Japan"
            lat = 35.68
            lng = 139.69
            value = 91.0
            category = "AI"
            developers = 158000

            [[arcs]]
            from = 0
            to = 4
        "#;

        let dataset = Dataset::from_toml_str(content).unwrap();

        assert_eq!(dataset.points.len(), 2);
        assert_eq!(dataset.arcs, vec![Arc { from: 0, to: 4 }]);
        assert_eq!(dataset.point(4).unwrap().city, "Tokyo");
        assert_eq!(dataset.point(4).unwrap().developers, 158000);
        assert_eq!(dataset.point(0).unwrap().category, Category::Ai);
    }

    #[test]
    fn arc_with_unknown_endpoint_is_a_configuration_error() {
        let points = vec![point(1, 0.0, 0.0, Category::Web3)];
        let arcs = vec![Arc { from: 1, to: 9 }];

        let err = Dataset::new(points, arcs).unwrap_err();

        assert!(matches!(err, DatasetError::UnknownPoint { arc: 0, id: 9 }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let points = vec![
            point(3, 0.0, 0.0, Category::Web3),
            point(3, 10.0, 10.0, Category::Ai),
        ];

        let err = Dataset::new(points, Vec::new()).unwrap_err();

        assert!(matches!(err, DatasetError::DuplicatePoint(3)));
    }

    #[test]
    fn coordinates_outside_the_globe_are_rejected() {
        let points = vec![point(2, 91.0, 0.0, Category::Frontend)];

        assert!(matches!(
            Dataset::new(points, Vec::new()),
            Err(DatasetError::OutOfRange { id: 2, .. })
        ));
    }

    #[test]
    fn endpoints_resolve_both_points() {
        let dataset = Dataset::new(
            vec![
                point(7, 1.0, 2.0, Category::Backend),
                point(8, 3.0, 4.0, Category::Frontend),
            ],
            vec![Arc { from: 8, to: 7 }],
        )
        .unwrap();

        let (from, to) = dataset.endpoints(&dataset.arcs[0]).unwrap();

        assert_eq!(from.id, 8);
        assert_eq!(to.id, 7);
    }
}

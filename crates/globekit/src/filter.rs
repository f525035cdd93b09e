use crate::dataset::{Category, Dataset, GeoPoint, PointId};
use std::collections::BTreeSet;

/// Active category selection, owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn admits(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(active) => active == category,
        }
    }

    pub fn admits_point(self, point: &GeoPoint) -> bool {
        self.admits(point.category)
    }

    /// An arc is shown when either endpoint passes the filter.
    pub fn admits_arc(self, from: &GeoPoint, to: &GeoPoint) -> bool {
        self.admits(from.category) || self.admits(to.category)
    }
}

/// The markers and arcs a given filter leaves on screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleSet {
    pub points: BTreeSet<PointId>,
    /// Indices into `Dataset::arcs`
    pub arcs: BTreeSet<usize>,
}

impl VisibleSet {
    pub fn compute(dataset: &Dataset, filter: CategoryFilter) -> Self {
        let points = dataset
            .points
            .iter()
            .filter(|p| filter.admits_point(p))
            .map(|p| p.id)
            .collect();

        let arcs = dataset
            .arcs
            .iter()
            .enumerate()
            .filter(|(_, arc)| {
                dataset
                    .endpoints(arc)
                    .is_some_and(|(from, to)| filter.admits_arc(from, to))
            })
            .map(|(i, _)| i)
            .collect();

        Self { points, arcs }
    }
}

/// What has to be spawned and despawned to go from one visible set to another.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibilityChange {
    pub spawn_points: Vec<PointId>,
    pub despawn_points: Vec<PointId>,
    pub spawn_arcs: Vec<usize>,
    pub despawn_arcs: Vec<usize>,
}

impl VisibilityChange {
    pub fn between(current: &VisibleSet, next: &VisibleSet) -> Self {
        Self {
            spawn_points: next.points.difference(&current.points).copied().collect(),
            despawn_points: current.points.difference(&next.points).copied().collect(),
            spawn_arcs: next.arcs.difference(&current.arcs).copied().collect(),
            despawn_arcs: current.arcs.difference(&next.arcs).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spawn_points.is_empty()
            && self.despawn_points.is_empty()
            && self.spawn_arcs.is_empty()
            && self.despawn_arcs.is_empty()
    }
}

//! In-memory incident store backed by an R-tree.
//!
//! Mirrors the envelope-query shape of the `DuckDB` backend so the two are
//! interchangeable behind [`IncidentStore`]. Used by tests and by callers
//! that already hold the record set in memory.

use rstar::{AABB, RTree, RTreeObject};
use safe_route_incident_models::{BoundingBox, Incident};

use crate::{IncidentStore, StoreError};

/// An incident stored in the R-tree with its point envelope.
struct StoredIncident {
    envelope: AABB<[f64; 2]>,
    incident: Incident,
}

impl RTreeObject for StoredIncident {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Incident store holding all records in an in-memory R-tree.
pub struct MemoryStore {
    tree: RTree<StoredIncident>,
}

impl MemoryStore {
    /// Builds a store from a record set.
    #[must_use]
    pub fn new(incidents: Vec<Incident>) -> Self {
        let entries = incidents
            .into_iter()
            .map(|incident| StoredIncident {
                envelope: AABB::from_point([incident.longitude, incident.latitude]),
                incident,
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }
}

impl IncidentStore for MemoryStore {
    fn fetch_bbox(&self, bbox: &BoundingBox) -> Result<Vec<Incident>, StoreError> {
        let envelope =
            AABB::from_corners([bbox.west, bbox.south], [bbox.east, bbox.north]);

        Ok(self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.incident.clone())
            .collect())
    }

    fn count(&self) -> Result<u64, StoreError> {
        Ok(self.tree.size() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(incident_type: &str, lat: f64, lng: f64) -> Incident {
        Incident {
            incident_type: incident_type.to_string(),
            latitude: lat,
            longitude: lng,
            datetime: "2026-08-01T12:00:00".to_string(),
        }
    }

    #[test]
    fn fetch_bbox_filters_by_envelope() {
        let store = MemoryStore::new(vec![
            sample("Assault Call", 41.88, -87.63),
            sample("Theft", 40.00, -80.00),
        ]);

        let bbox = BoundingBox::new(-87.7, 41.8, -87.6, 41.9);
        let fetched = store.fetch_bbox(&bbox).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].incident_type, "Assault Call");
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn empty_store_fetches_nothing() {
        let store = MemoryStore::new(Vec::new());
        let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
        assert!(store.fetch_bbox(&bbox).unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn point_on_bbox_edge_is_included() {
        let store = MemoryStore::new(vec![sample("Theft", 41.8, -87.7)]);
        let bbox = BoundingBox::new(-87.7, 41.8, -87.6, 41.9);
        assert_eq!(store.fetch_bbox(&bbox).unwrap().len(), 1);
    }
}

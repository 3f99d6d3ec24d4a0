//! Deduplicating, insertion-ordered collection of trip offers.

use crate::trip::Trip;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Offer collection with at most one trip per `cache_id`.
///
/// Backed by a single insertion-order-preserving map, so the lookup
/// structure and the iteration order cannot fall out of sync. Iteration
/// order is insertion order until a `sort_by_*` call reorders it; a
/// cheaper replacement keeps the incumbent's position.
#[derive(Clone, Debug, Default)]
pub struct Trips {
    inner: IndexMap<String, Trip>,
}

impl Trips {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an offer, keeping the cheaper one on `cache_id` clashes.
    /// Price ties keep the incumbent.
    pub fn add(&mut self, trip: Trip) {
        match self.inner.get(&trip.cache_id) {
            Some(existing) if existing.price() <= trip.price() => {}
            _ => {
                self.inner.insert(trip.cache_id.clone(), trip);
            }
        }
    }

    /// Folds every offer of `other` into this collection, in `other`'s
    /// iteration order, applying the [`add`](Self::add) rule. The final
    /// (cache_id, lowest price) content is merge-order independent.
    pub fn merge(&mut self, other: Trips) {
        for (_, trip) in other.inner {
            self.add(trip);
        }
    }

    pub fn get(&self, cache_id: &str) -> Option<&Trip> {
        self.inner.get(cache_id)
    }

    pub fn contains(&self, cache_id: &str) -> bool {
        self.inner.contains_key(cache_id)
    }

    /// Removes an offer if present; the survivors keep their order.
    pub fn remove(&mut self, cache_id: &str) -> Option<Trip> {
        self.inner.shift_remove(cache_id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn first(&self) -> Option<&Trip> {
        self.inner.first().map(|(_, trip)| trip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trip> {
        self.inner.values()
    }

    pub fn to_vec(&self) -> Vec<Trip> {
        self.inner.values().cloned().collect()
    }

    /// Stable ascending reorder by price; ties keep their prior
    /// relative order.
    pub fn sort_by_price(&mut self) {
        self.inner.sort_by(|_, a, _, b| {
            a.price().partial_cmp(&b.price()).unwrap_or(Ordering::Equal)
        });
    }

    /// Stable ascending reorder by total route duration.
    pub fn sort_by_duration(&mut self) {
        self.inner
            .sort_by(|_, a, _, b| a.route_duration_minutes().cmp(&b.route_duration_minutes()));
    }
}

impl From<Vec<Trip>> for Trips {
    /// Rebuilds a collection from a flat list, re-applying the dedup
    /// rule (used when deserializing cached payloads).
    fn from(trips: Vec<Trip>) -> Self {
        let mut out = Trips::new();
        for trip in trips {
            out.add(trip);
        }
        out
    }
}

impl<'a> IntoIterator for &'a Trips {
    type Item = &'a Trip;
    type IntoIter = indexmap::map::Values<'a, String, Trip>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.values()
    }
}

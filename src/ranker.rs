/*
Proximity ranking: order candidates by great-circle distance from a reference point.

rank(reference, candidates): full stable sort by distance, ties keep input order.
nearest(reference, candidates, limit): same ordering, but only the first `limit` entries,
      kept in a bounded max-heap of size `limit` so the remainder is never sorted.

Neither function holds on to its input: callers pass a fresh candidate list on every query.
*/

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use orx_priority_queue::{BinaryHeap, PriorityQueue};

use crate::geo::{distance, GeoPoint};

/// A record to be ranked together with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<T> {
    pub item: T,
    pub point: GeoPoint,
}

impl<T> Candidate<T> {
    pub fn new(item: T, point: GeoPoint) -> Self {
        Self { item, point }
    }
}

/// A candidate with its distance from the reference point, in kilometres.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    pub item: T,
    pub point: GeoPoint,
    pub distance_km: f64,
}

impl<T> Ranked<T> {
    pub fn into_item(self) -> T {
        self.item
    }
}

pub type RankedResult<T> = Vec<Ranked<T>>;

fn measure<T>(reference: GeoPoint, candidate: Candidate<T>) -> Ranked<T> {
    Ranked {
        distance_km: distance(reference, candidate.point),
        item: candidate.item,
        point: candidate.point,
    }
}

/// Ranks every candidate by ascending distance from `reference`.
pub fn rank<T, I>(reference: GeoPoint, candidates: I) -> RankedResult<T>
where
    I: IntoIterator<Item = Candidate<T>>,
{
    let mut ranked: Vec<Ranked<T>> = candidates
        .into_iter()
        .map(|c| measure(reference, c))
        .collect();
    // sort_by_key is stable, so equal distances stay in input order.
    ranked.sort_by_key(|r| OrderedFloat(r.distance_km));
    ranked
}

/// The `limit` closest candidates, ordered exactly as [`rank`] would order them.
pub fn nearest<T, I>(reference: GeoPoint, candidates: I, limit: usize) -> RankedResult<T>
where
    I: IntoIterator<Item = Candidate<T>>,
{
    if limit == 0 {
        return Vec::new();
    }

    // Min-heap over reversed keys acts as a max-heap of (distance, input index):
    // the root is always the worst of the entries kept so far.
    let mut heap: BinaryHeap<usize, Reverse<(OrderedFloat<f64>, usize)>> = BinaryHeap::default();
    let mut slots: Vec<Option<Ranked<T>>> = Vec::new();

    for (idx, candidate) in candidates.into_iter().enumerate() {
        let ranked = measure(reference, candidate);
        let key = (OrderedFloat(ranked.distance_km), idx);
        if heap.len() == limit {
            let closer = matches!(heap.peek(), Some((_, Reverse(worst))) if key < *worst);
            if !closer {
                slots.push(None);
                continue;
            }
            if let Some((evicted, _)) = heap.pop() {
                slots[evicted] = None;
            }
        }
        heap.push(idx, Reverse(key));
        slots.push(Some(ranked));
    }

    // Heap pops worst-first.
    let mut out = Vec::with_capacity(heap.len());
    while let Some((idx, _)) = heap.pop() {
        if let Some(ranked) = slots[idx].take() {
            out.push(ranked);
        }
    }
    out.reverse();
    out
}

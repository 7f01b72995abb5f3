//! Aggregation of raw invocation events into a coupling matrix

use crate::coupling::matrix::{index_key, CouplingMatrix};
use crate::coupling::{ClassId, InvocationEvent};
use std::collections::HashMap;

/// Builder for incrementally turning invocation events into a `CouplingMatrix`
#[derive(Debug, Default)]
pub struct CouplingAggregator {
    /// Mapping from class names to class indices
    class_index: HashMap<ClassId, u32>,

    /// Class names in first-appearance order; renumbered by name in `build`
    classes: Vec<ClassId>,

    /// Undirected counts keyed by canonical index pair
    pair_counts: HashMap<(u32, u32), u64>,

    /// Directed counts keyed by (caller, callee)
    directed_counts: HashMap<(u32, u32), u64>,

    /// Cross-class invocations seen so far
    total_invocations: u64,

    /// Self-invocations seen and discarded
    self_invocations: u64,
}

impl CouplingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the index for a class
    fn get_or_create_class(&mut self, class: &ClassId) -> u32 {
        if let Some(&idx) = self.class_index.get(class) {
            return idx;
        }

        let idx = self.classes.len() as u32;
        self.class_index.insert(class.clone(), idx);
        self.classes.push(class.clone());

        idx
    }

    /// Record one invocation of `callee` from `caller`.
    ///
    /// Self-invocations are counted as discarded and otherwise ignored; a
    /// class only enters the matrix through a cross-class invocation.
    pub fn record(&mut self, caller: &ClassId, callee: &ClassId) {
        if caller == callee {
            self.self_invocations += 1;
            return;
        }

        let caller_idx = self.get_or_create_class(caller);
        let callee_idx = self.get_or_create_class(callee);

        *self
            .pair_counts
            .entry(index_key(caller_idx, callee_idx))
            .or_insert(0) += 1;
        *self
            .directed_counts
            .entry((caller_idx, callee_idx))
            .or_insert(0) += 1;
        self.total_invocations += 1;
    }

    pub fn record_event(&mut self, event: &InvocationEvent) {
        self.record(&event.caller, &event.callee);
    }

    pub fn extend<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = InvocationEvent>,
    {
        for event in events {
            self.record_event(&event);
        }
    }

    pub fn total_invocations(&self) -> u64 {
        self.total_invocations
    }

    pub fn self_invocations(&self) -> u64 {
        self.self_invocations
    }

    /// Normalize the counts and build the matrix.
    ///
    /// Classes are renumbered in lexicographic order, so the matrix depends
    /// only on the multiset of events and not on the order they arrived in.
    pub fn build(self) -> CouplingMatrix {
        let denominator = self.total_invocations.max(1) as f64;

        let mut classes = self.classes.clone();
        classes.sort();
        let class_index: HashMap<ClassId, u32> = classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.clone(), idx as u32))
            .collect();

        // Old interning index -> sorted index
        let remap: Vec<u32> = self
            .classes
            .iter()
            .map(|class| class_index[class])
            .collect();

        let pair_counts: HashMap<(u32, u32), u64> = self
            .pair_counts
            .iter()
            .map(|(&(a, b), &count)| (index_key(remap[a as usize], remap[b as usize]), count))
            .collect();
        let directed_counts = self
            .directed_counts
            .iter()
            .map(|(&(a, b), &count)| ((remap[a as usize], remap[b as usize]), count))
            .collect();
        let weights = pair_counts
            .iter()
            .map(|(&key, &count)| (key, count as f64 / denominator))
            .collect();

        log::debug!(
            "Aggregated {} invocations over {} classes into {} coupled pairs ({} self-invocations discarded)",
            self.total_invocations,
            classes.len(),
            pair_counts.len(),
            self.self_invocations
        );

        CouplingMatrix {
            classes,
            class_index,
            pair_counts,
            directed_counts,
            weights,
            total_invocations: self.total_invocations,
        }
    }
}

/// Aggregate a complete event sequence into a coupling matrix
pub fn aggregate<I>(events: I) -> CouplingMatrix
where
    I: IntoIterator<Item = InvocationEvent>,
{
    let mut aggregator = CouplingAggregator::new();
    aggregator.extend(events);
    aggregator.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn events(pairs: &[(&str, &str)]) -> Vec<InvocationEvent> {
        pairs
            .iter()
            .map(|&(a, b)| InvocationEvent::new(a, b))
            .collect()
    }

    #[test]
    fn test_mixed_direction_pair_shares_count() {
        let matrix = aggregate(events(&[("A", "B"), ("B", "A"), ("A", "C")]));

        assert_eq!(matrix.total_invocations(), 3);
        assert_eq!(matrix.weight("A", "B"), Some(2.0 / 3.0));
        assert_eq!(matrix.weight("A", "C"), Some(1.0 / 3.0));
        assert_eq!(matrix.weight("B", "C"), None);
        assert_eq!(matrix.len(), 2);
    }

    #[test]
    fn test_self_invocations_are_discarded() {
        let mut aggregator = CouplingAggregator::new();
        aggregator.extend(events(&[("A", "A"), ("A", "B"), ("Z", "Z")]));

        assert_eq!(aggregator.self_invocations(), 2);
        assert_eq!(aggregator.total_invocations(), 1);

        let matrix = aggregator.build();
        assert_eq!(matrix.weight("A", "B"), Some(1.0));
        // A class seen only in self-invocations never becomes a key
        assert_eq!(matrix.index_of("Z"), None);
        assert_eq!(matrix.class_count(), 2);
    }

    #[test]
    fn test_only_self_invocations_yield_empty_matrix() {
        let matrix = aggregate(events(&[("A", "A"), ("B", "B")]));

        assert!(matrix.is_empty());
        assert_eq!(matrix.class_count(), 0);
        assert_eq!(matrix.total_invocations(), 0);
    }

    #[test]
    fn test_no_events_yield_empty_matrix() {
        let matrix = aggregate(Vec::<InvocationEvent>::new());
        assert!(matrix.is_empty());
        assert_eq!(matrix.total_invocations(), 0);
    }

    #[test]
    fn test_classes_are_ordered_by_name() {
        let matrix = aggregate(events(&[("C", "A"), ("B", "C"), ("D", "A")]));
        let names: Vec<&str> = matrix.classes().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
        assert_eq!(matrix.index_of("C"), Some(2));
        assert_eq!(matrix.directed_count("C", "A"), 1);
        assert_eq!(matrix.directed_count("A", "C"), 0);
    }

    #[test]
    fn test_reversed_events_build_identical_matrix() {
        let forward = events(&[("A", "B"), ("B", "C"), ("D", "E"), ("E", "F")]);
        let mut reversed = forward.clone();
        reversed.reverse();

        let forward = aggregate(forward);
        let reversed = aggregate(reversed);
        assert_eq!(forward, reversed);
    }

    fn class_name() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["A", "B", "C", "D", "E", "F"]).prop_map(String::from)
    }

    fn event_list() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec((class_name(), class_name()), 0..60)
    }

    fn to_events(raw: &[(String, String)]) -> Vec<InvocationEvent> {
        raw.iter()
            .map(|(a, b)| InvocationEvent::new(a.as_str(), b.as_str()))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_weights_are_symmetric_and_bounded(raw in event_list()) {
            let matrix = aggregate(to_events(&raw));
            for pair in matrix.pairs() {
                let (a, b) = (pair.pair.first().as_str(), pair.pair.second().as_str());
                prop_assert_eq!(matrix.weight(a, b), matrix.weight(b, a));
                prop_assert!(pair.weight > 0.0 && pair.weight <= 1.0);
            }
        }

        #[test]
        fn prop_directed_counts_sum_to_total(raw in event_list()) {
            let matrix = aggregate(to_events(&raw));
            let directed: u64 = matrix.directed_counts().map(|(_, _, c)| c).sum();
            let cross = raw.iter().filter(|(a, b)| a != b).count() as u64;
            prop_assert_eq!(directed, matrix.total_invocations());
            prop_assert_eq!(cross, matrix.total_invocations());
        }

        #[test]
        fn prop_self_invocations_never_change_matrix(
            raw in event_list(),
            noise in prop::collection::vec(class_name(), 0..10),
        ) {
            let clean = aggregate(to_events(&raw));
            let mut noisy_events = to_events(&raw);
            // Only add self-invocations for classes already present so the
            // key set is unchanged
            for name in noise {
                if clean.index_of(&name).is_some() {
                    noisy_events.push(InvocationEvent::new(name.as_str(), name.as_str()));
                }
            }
            let noisy = aggregate(noisy_events);
            prop_assert_eq!(clean.pairs(), noisy.pairs());
            prop_assert_eq!(clean.total_invocations(), noisy.total_invocations());
        }

        #[test]
        fn prop_matrix_independent_of_event_order(
            (raw, shuffled) in event_list().prop_flat_map(|raw| {
                let shuffled = Just(raw.clone()).prop_shuffle();
                (Just(raw), shuffled)
            }),
        ) {
            let forward = aggregate(to_events(&raw));
            let permuted = aggregate(to_events(&shuffled));

            prop_assert_eq!(&forward, &permuted);
            let bits = |m: &CouplingMatrix| -> Vec<u64> {
                m.pairs().iter().map(|p| p.weight.to_bits()).collect()
            };
            prop_assert_eq!(bits(&forward), bits(&permuted));
        }
    }
}

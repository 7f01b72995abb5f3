//! Event preprocessing: restrict invocation events to project classes

use crate::coupling::{ClassId, InvocationEvent};
use serde::Serialize;
use std::collections::HashSet;

/// Counts of events kept and dropped by an `EventFilter`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub kept: usize,

    /// Events with an empty caller or callee name
    pub blank: usize,

    /// Events touching a class with an excluded prefix
    pub excluded: usize,

    /// Events touching a class outside the project class list
    pub unknown: usize,
}

impl FilterStats {
    pub fn dropped(&self) -> usize {
        self.blank + self.excluded + self.unknown
    }
}

/// Decides which classes belong to the analyzed project
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    excluded_prefixes: Vec<String>,
    project_classes: Option<HashSet<ClassId>>,
}

impl EventFilter {
    pub fn new(excluded_prefixes: Vec<String>) -> Self {
        Self {
            excluded_prefixes,
            project_classes: None,
        }
    }

    /// Only keep events whose classes are all in `classes`
    pub fn with_project_classes(mut self, classes: HashSet<ClassId>) -> Self {
        self.project_classes = Some(classes);
        self
    }

    fn is_excluded(&self, class: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| class.starts_with(prefix.as_str()))
    }

    fn is_known(&self, class: &str) -> bool {
        self.project_classes
            .as_ref()
            .map_or(true, |classes| classes.contains(class))
    }

    /// Whether `class` counts as a project-defined class
    pub fn is_project_class(&self, class: &str) -> bool {
        !class.trim().is_empty() && !self.is_excluded(class) && self.is_known(class)
    }

    /// Split `events` into kept events and drop statistics.
    ///
    /// Self-invocations pass through untouched; the aggregator discards them.
    pub fn apply(&self, events: Vec<InvocationEvent>) -> (Vec<InvocationEvent>, FilterStats) {
        let mut stats = FilterStats::default();
        let mut kept = Vec::with_capacity(events.len());

        for event in events {
            let (caller, callee) = (event.caller.as_str(), event.callee.as_str());

            if caller.trim().is_empty() || callee.trim().is_empty() {
                stats.blank += 1;
            } else if self.is_excluded(caller) || self.is_excluded(callee) {
                stats.excluded += 1;
            } else if !self.is_known(caller) || !self.is_known(callee) {
                stats.unknown += 1;
            } else {
                kept.push(event);
            }
        }

        stats.kept = kept.len();
        log::info!(
            "Kept {} of {} events ({} blank, {} library, {} outside project)",
            stats.kept,
            stats.kept + stats.dropped(),
            stats.blank,
            stats.excluded,
            stats.unknown
        );

        (kept, stats)
    }
}

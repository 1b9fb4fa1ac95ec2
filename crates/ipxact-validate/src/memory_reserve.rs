//! Interval reservations used to detect overlapping address or bit ranges.

use crate::finding::{push_unique, Category, Finding};

/// `[begin, begin + size)` lies within `[0, limit)`. Overflowing spans never fit.
pub fn span_fits(begin: i128, size: i128, limit: i128) -> bool {
    begin >= 0 && begin.checked_add(size).is_some_and(|end| end <= limit)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReservedArea {
    id: String,
    begin: i128,
    end: i128,
}

impl ReservedArea {
    fn overlaps(&self, other: &ReservedArea) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }
}

/// A set of inclusive `[begin, end]` ranges, each claimed by an identifier.
///
/// Two checks are offered: ranges of *different* identifiers overlapping
/// (registers in a block, fields in a register) and ranges of the *same*
/// identifier overlapping (port maps of one logical port).
#[derive(Debug, Clone, Default)]
pub struct MemoryReserve {
    areas: Vec<ReservedArea>,
}

impl MemoryReserve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `[begin, end]` for `id`. Reversed bounds are normalized.
    pub fn add_area(&mut self, id: impl Into<String>, begin: i128, end: i128) {
        let (begin, end) = if end < begin { (end, begin) } else { (begin, end) };
        self.areas.push(ReservedArea {
            id: id.into(),
            begin,
            end,
        });
    }

    /// Reserve `size` units starting at `begin`. Returns false, reserving
    /// nothing, when the last unit is not representable.
    pub fn add_span(&mut self, id: impl Into<String>, begin: i128, size: i128) -> bool {
        match begin.checked_add(size).and_then(|end| end.checked_sub(1)) {
            Some(end) => {
                self.add_area(id, begin, end);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    fn pairs(&self) -> impl Iterator<Item = (&ReservedArea, &ReservedArea)> {
        self.areas
            .iter()
            .enumerate()
            .flat_map(move |(i, a)| self.areas[i + 1..].iter().map(move |b| (a, b)))
    }

    /// True when areas of two different identifiers overlap.
    pub fn has_overlap(&self) -> bool {
        self.pairs().any(|(a, b)| a.id != b.id && a.overlaps(b))
    }

    /// True when two areas of the same identifier overlap.
    pub fn has_id_dependant_overlap(&self) -> bool {
        self.pairs().any(|(a, b)| a.id == b.id && a.overlaps(b))
    }

    /// Report every pair of different identifiers whose areas overlap.
    pub fn find_errors_in_overlap(&self, errors: &mut Vec<Finding>, element: &str, context: &str) {
        for (a, b) in self.pairs().filter(|(a, b)| a.id != b.id && a.overlaps(b)) {
            push_unique(
                errors,
                Finding::new(
                    Category::Inconsistency,
                    format!("{element} {} and {} overlap within {context}", a.id, b.id),
                ),
            );
        }
    }

    /// Report every pair of overlapping areas claimed by the same identifier.
    pub fn find_errors_in_id_dependant_overlap(
        &self,
        errors: &mut Vec<Finding>,
        element: &str,
        context: &str,
    ) {
        for (a, b) in self.pairs().filter(|(a, b)| a.id == b.id && a.overlaps(b)) {
            push_unique(
                errors,
                Finding::new(
                    Category::Inconsistency,
                    format!(
                        "Ranges [{}, {}] and [{}, {}] of {element} {} overlap within {context}",
                        a.begin, a.end, b.begin, b.end, a.id
                    ),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn different_ids_overlap() {
        let mut reserve = MemoryReserve::new();
        reserve.add_area("a", 0, 7);
        reserve.add_area("b", 4, 11);
        assert!(reserve.has_overlap());
        assert!(!reserve.has_id_dependant_overlap());

        let mut errors = Vec::new();
        reserve.find_errors_in_overlap(&mut errors, "Fields", "register ctrl");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Fields a and b overlap within register ctrl");
    }

    #[test]
    fn adjacent_areas_do_not_overlap() {
        let mut reserve = MemoryReserve::new();
        reserve.add_area("a", 0, 7);
        reserve.add_area("a", 8, 15);
        reserve.add_area("b", 16, 16);
        assert!(!reserve.has_overlap());
        assert!(!reserve.has_id_dependant_overlap());
    }

    #[test]
    fn same_id_overlap() {
        let mut reserve = MemoryReserve::new();
        reserve.add_area("DATA", 7, 0);
        reserve.add_area("DATA", 4, 11);
        reserve.add_area("ADDR", 0, 3);
        assert!(reserve.has_id_dependant_overlap());

        let mut errors = Vec::new();
        reserve.find_errors_in_id_dependant_overlap(&mut errors, "logical port", "slave bus");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("[0, 7] and [4, 11]"));
    }

    #[test]
    fn spans_near_the_integer_limit() {
        let mut reserve = MemoryReserve::new();
        assert!(reserve.add_span("low", 0, 8));
        assert!(!reserve.add_span("huge", 1, i128::MAX));
        assert!(reserve.add_span("top", i128::MAX, 1));
        assert_eq!(reserve.len(), 2);
        assert!(!reserve.has_overlap());

        assert!(span_fits(0, 4, 4));
        assert!(!span_fits(1, 4, 4));
        assert!(!span_fits(-1, 1, 4));
        assert!(!span_fits(i128::MAX, i128::MAX, i128::MAX));
    }

    #[test]
    fn single_point_areas() {
        let mut reserve = MemoryReserve::new();
        reserve.add_area("x", 3, 3);
        reserve.add_area("y", 3, 3);
        assert!(reserve.has_overlap());
        assert_eq!(reserve.len(), 2);
    }
}

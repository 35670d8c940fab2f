//! Retention arithmetic for capacity-bounded collections.
//!
//! A bounded collection keeps at most `capacity` records. Before a new
//! record is inserted, enough of the oldest records are evicted that the
//! collection holds `capacity - 1` records, so the insert lands exactly on
//! the bound and never above it.

/// Number of most recent generated code entries that are retained.
pub const GENERATED_CODE_CAPACITY: usize = 10;

/// Retention policy attached to a bounded insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    /// Maximum number of records held after the insert completes.
    pub capacity: usize,
    /// Top-level field whose ascending order defines "oldest".
    pub order_by: &'static str,
}

impl Retention {
    pub const fn new(capacity: usize, order_by: &'static str) -> Self {
        Self { capacity, order_by }
    }

    /// How many of the oldest records must be evicted before inserting one
    /// more into a collection that currently holds `current` records.
    ///
    /// Returns `0` below capacity. A zero capacity is treated as one, since
    /// the record being inserted is always kept.
    pub fn evictions_before_insert(&self, current: usize) -> usize {
        let keep = self.capacity.max(1) - 1;
        current.saturating_sub(keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: Retention = Retention::new(GENERATED_CODE_CAPACITY, "created_at");

    #[test]
    fn below_capacity_evicts_nothing() {
        assert_eq!(POLICY.evictions_before_insert(0), 0);
        assert_eq!(POLICY.evictions_before_insert(9), 0);
    }

    #[test]
    fn at_capacity_evicts_one() {
        assert_eq!(POLICY.evictions_before_insert(10), 1);
    }

    #[test]
    fn above_capacity_trims_back_to_nine() {
        // Can only happen if records were written around the bounded path.
        assert_eq!(POLICY.evictions_before_insert(14), 5);
    }

    #[test]
    fn zero_capacity_keeps_only_the_new_record() {
        let policy = Retention::new(0, "created_at");
        assert_eq!(policy.evictions_before_insert(3), 3);
        assert_eq!(policy.evictions_before_insert(0), 0);
    }
}

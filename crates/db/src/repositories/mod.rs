//! Repository layer: typed operations over the document store.
//!
//! Each repository is a zero-sized struct whose async methods take a
//! `&dyn DocumentStore` as the first argument.

pub mod build_log_repo;
pub mod generated_code_repo;
pub mod stats_repo;

pub use build_log_repo::BuildLogRepo;
pub use generated_code_repo::GeneratedCodeRepo;
pub use stats_repo::StatsRepo;

/// Upper bound on any page size a caller may request.
pub const MAX_LIMIT: u64 = 1000;

/// Clamp a requested page size to [`MAX_LIMIT`].
pub(crate) fn clamp_limit(requested: Option<u64>, default: u64) -> u64 {
    requested.unwrap_or(default).min(MAX_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_applies_default_and_ceiling() {
        assert_eq!(clamp_limit(None, 100), 100);
        assert_eq!(clamp_limit(Some(5), 100), 5);
        assert_eq!(clamp_limit(Some(0), 100), 0);
        assert_eq!(clamp_limit(Some(50_000), 100), MAX_LIMIT);
    }
}

//! Well-known build statuses and build categories.
//!
//! The store accepts any string for `status` and `type`; these constants are
//! only the labels the statistics endpoint aggregates over.

/// A build that has been triggered and has not finished yet.
pub const STATUS_RUNNING: &str = "running";

/// A build that finished successfully.
pub const STATUS_COMPLETED: &str = "completed";

/// A build that finished with an error.
pub const STATUS_FAILED: &str = "failed";

/// JTAF test automation framework builds.
pub const TYPE_JTAF: &str = "JTAF Framework";

/// Floating framework deployments.
pub const TYPE_FLOATING: &str = "Floating Framework";

/// Operating system image builds.
pub const TYPE_OS_MAKING: &str = "OS Making";

//! Aggregate statistics returned by `GET /stats`.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformStats {
    pub build_logs: BuildLogStats,
    pub generated_code: GeneratedCodeStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildLogStats {
    pub total: u64,
    pub running: u64,
    pub completed: u64,
    pub failed: u64,
    pub by_type: BuildTypeCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildTypeCounts {
    pub jtaf: u64,
    pub floating: u64,
    pub os_making: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedCodeStats {
    pub total: u64,
    /// Retention capacity of the collection.
    pub limit: u64,
}

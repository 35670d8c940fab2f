//! Aggregate counts across both collections.

use fwhub_core::build_labels::{
    STATUS_COMPLETED, STATUS_FAILED, STATUS_RUNNING, TYPE_FLOATING, TYPE_JTAF, TYPE_OS_MAKING,
};
use fwhub_core::retention::GENERATED_CODE_CAPACITY;

use crate::models::stats::{BuildLogStats, BuildTypeCounts, GeneratedCodeStats, PlatformStats};
use crate::store::{DocumentStore, StoreResult};

use super::{BuildLogRepo, GeneratedCodeRepo};

pub struct StatsRepo;

impl StatsRepo {
    /// Count build logs by status and type, and generated code entries.
    ///
    /// Counts are taken one after another and are not a consistent snapshot
    /// under concurrent writes.
    pub async fn collect(store: &dyn DocumentStore) -> StoreResult<PlatformStats> {
        let build_logs = BuildLogStats {
            total: BuildLogRepo::count(store, None, None).await?,
            running: BuildLogRepo::count(store, Some(STATUS_RUNNING), None).await?,
            completed: BuildLogRepo::count(store, Some(STATUS_COMPLETED), None).await?,
            failed: BuildLogRepo::count(store, Some(STATUS_FAILED), None).await?,
            by_type: BuildTypeCounts {
                jtaf: BuildLogRepo::count(store, None, Some(TYPE_JTAF)).await?,
                floating: BuildLogRepo::count(store, None, Some(TYPE_FLOATING)).await?,
                os_making: BuildLogRepo::count(store, None, Some(TYPE_OS_MAKING)).await?,
            },
        };
        let generated_code = GeneratedCodeStats {
            total: GeneratedCodeRepo::count(store).await?,
            limit: GENERATED_CODE_CAPACITY as u64,
        };
        Ok(PlatformStats {
            build_logs,
            generated_code,
        })
    }
}

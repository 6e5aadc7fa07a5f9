use std::time::Duration;

use onx_common::{debug_log, log};

use crate::session_pool::SessionPool;

pub struct CleanupTask {
    pool: SessionPool,
    check_interval: Duration,
}

impl CleanupTask {
    pub fn new(pool: SessionPool, check_interval: Duration) -> Self {
        Self {
            pool,
            check_interval,
        }
    }

    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.check_interval);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            self.cleanup().await;
        }
    }

    async fn cleanup(&self) {
        let report = self.pool.purge_expired().await;
        if report.expired_entries > 0 || report.dead_slots > 0 {
            log!(
                "Purged {} expired sessions and {} dead waiting slots",
                report.expired_entries,
                report.dead_slots
            );
        } else {
            debug_log!("Cleanup found nothing to purge");
        }
    }
}

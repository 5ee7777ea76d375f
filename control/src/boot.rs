use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use schema::{BootStatus, BootStatusProvider};

/// Owns the session's boot flag. The flag only ever moves from
/// `Unstarted` to `Booted`.
#[derive(Debug, Default)]
pub struct SystemBootService {
    booted: AtomicBool,
    /// Time taken to boot, already adjusted for speed
    boot_delay: Duration,
    unbooted_access_attempts: AtomicUsize,
}

impl SystemBootService {
    pub fn new(boot_delay: Duration) -> Self {
        Self {
            boot_delay,
            ..Default::default()
        }
    }

    pub fn status(&self) -> BootStatus {
        if self.booted.load(Ordering::Acquire) {
            BootStatus::Booted
        } else {
            BootStatus::Unstarted
        }
    }

    /// Boot the system, resolving immediately if it is already booted
    pub async fn boot(&self) -> BootStatus {
        if self.is_booted() {
            return BootStatus::Booted;
        }

        tokio::time::sleep(self.boot_delay).await;
        if !self.booted.swap(true, Ordering::AcqRel) {
            log::info!("system booted");
        }

        BootStatus::Booted
    }

    /// Number of times the queue was used before boot
    pub fn unbooted_access_attempts(&self) -> usize {
        self.unbooted_access_attempts.load(Ordering::Relaxed)
    }
}

impl BootStatusProvider for SystemBootService {
    fn is_booted(&self) -> bool {
        self.status() == BootStatus::Booted
    }

    fn handle_unbooted_access(&self) {
        self.unbooted_access_attempts.fetch_add(1, Ordering::Relaxed);
        log::warn!("unbooted system access, operator must boot the system first");
    }
}

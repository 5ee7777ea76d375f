use std::fmt;

/// Session readiness of the control system. Once `Booted`, never reverts.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootStatus {
    #[default]
    Unstarted,
    Booted,
}

impl fmt::Display for BootStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unstarted => f.write_str("Unstarted"),
            Self::Booted => f.write_str("Booted"),
        }
    }
}

/// Owner of the boot flag, consulted before every queue operation
pub trait BootStatusProvider {
    fn is_booted(&self) -> bool;

    /// Notification that someone tried to use the queue before boot.
    /// What happens next (e.g. sending the operator back to the boot screen)
    /// is up to the provider.
    fn handle_unbooted_access(&self);
}

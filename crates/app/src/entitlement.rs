//! Session entitlement checks.

use async_trait::async_trait;
use intervox_foundation::SessionError;
use parking_lot::Mutex;
use tracing::info;

/// Decides whether a new interview session may begin.
///
/// Checked once, before question generation; a running session is never
/// interrupted by its entitlement expiring.
#[async_trait]
pub trait EntitlementGate: Send + Sync {
    /// Reserve one session, consuming a credit where applicable.
    async fn reserve_session(&self) -> Result<(), SessionError>;
}

/// No limits; every session is allowed.
pub struct UnlimitedEntitlements;

#[async_trait]
impl EntitlementGate for UnlimitedEntitlements {
    async fn reserve_session(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

/// A fixed pool of prepaid interview credits, one consumed per session.
pub struct PrepaidCredits {
    remaining: Mutex<u32>,
}

impl PrepaidCredits {
    pub fn new(credits: u32) -> Self {
        Self {
            remaining: Mutex::new(credits),
        }
    }

    pub fn remaining(&self) -> u32 {
        *self.remaining.lock()
    }
}

#[async_trait]
impl EntitlementGate for PrepaidCredits {
    async fn reserve_session(&self) -> Result<(), SessionError> {
        let mut remaining = self.remaining.lock();
        if *remaining == 0 {
            return Err(SessionError::InvalidConfiguration(
                "No interview credits remaining.".to_string(),
            ));
        }
        *remaining -= 1;
        info!(target: "entitlement", "Reserved a session; {} credit(s) left", *remaining);
        Ok(())
    }
}

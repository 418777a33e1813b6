//! services/client/src/gateway/credential.rs
//!
//! The gateway's in-memory bearer token slot.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// The token together with the generation it was installed under.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub token: Option<String>,
    pub generation: u64,
}

/// Holds the current bearer token. Every change bumps a generation counter so
/// in-flight requests can tell whether the session they started under is
/// still the active one.
#[derive(Default)]
pub struct CredentialSlot {
    inner: Mutex<Snapshot>,
}

impl CredentialSlot {
    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, token: Option<String>) -> u64 {
        let mut slot = self.lock();
        slot.token = token;
        slot.generation += 1;
        slot.generation
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn is_set(&self) -> bool {
        self.lock().token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_change_bumps_the_generation() {
        let slot = CredentialSlot::default();
        assert_eq!(slot.generation(), 0);
        assert!(!slot.is_set());

        assert_eq!(slot.set(Some("T".into())), 1);
        assert!(slot.is_set());
        assert_eq!(slot.set(None), 2);

        let snapshot = slot.snapshot();
        assert_eq!(snapshot.token, None);
        assert_eq!(snapshot.generation, 2);
    }
}

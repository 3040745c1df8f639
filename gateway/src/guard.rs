use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

/// Which submission a guard protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Submission {
    SaveRoute,
    StartTrip,
}

impl Submission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SaveRoute => "save-route",
            Self::StartTrip => "start-trip",
        }
    }
}

/// At most one in-flight submission per user and kind.
///
/// A double-clicked "save" or "start" must not create two backend records,
/// so the second request is refused while the first is still running.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<(u64, Submission)>>>,
}

impl InFlight {
    pub fn try_acquire(&self, user_id: u64, kind: Submission) -> Option<InFlightGuard> {
        let key = (user_id, kind);
        let inserted = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);
        inserted.then(|| InFlightGuard {
            active: Arc::clone(&self.active),
            key,
        })
    }

    #[cfg(test)]
    fn is_active(&self, user_id: u64, kind: Submission) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(user_id, kind))
    }
}

/// Releases the slot on drop, including when the request future is cancelled.
#[derive(Debug)]
pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<(u64, Submission)>>>,
    key: (u64, Submission),
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_submission_is_refused_until_release() {
        let in_flight = InFlight::default();
        let guard = in_flight.try_acquire(7, Submission::StartTrip);
        assert!(guard.is_some());
        assert!(in_flight.try_acquire(7, Submission::StartTrip).is_none());

        drop(guard);
        assert!(!in_flight.is_active(7, Submission::StartTrip));
        assert!(in_flight.try_acquire(7, Submission::StartTrip).is_some());
    }

    #[test]
    fn users_and_kinds_are_independent() {
        let in_flight = InFlight::default();
        let _trip = in_flight.try_acquire(7, Submission::StartTrip).unwrap();
        assert!(in_flight.try_acquire(8, Submission::StartTrip).is_some());
        assert!(in_flight.try_acquire(7, Submission::SaveRoute).is_some());
    }

    #[test]
    fn clones_share_state() {
        let in_flight = InFlight::default();
        let other = in_flight.clone();
        let _guard = in_flight.try_acquire(1, Submission::SaveRoute).unwrap();
        assert!(other.is_active(1, Submission::SaveRoute));
    }
}

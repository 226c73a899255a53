//! In-memory adapters: session-scoped implementations of the stores.
//!
//! Both stores live only as long as the process and are discarded on exit.
//!
//! # Mutex Behavior
//!
//! Each store guards its map with a single `Mutex`, which makes
//! check-then-insert (registration) and stamp-then-push (append) atomic.
//! A poisoned mutex is recovered rather than propagated: every mutation is a
//! single `insert`/`push`, so the map is never observed half-written and the
//! store operations stay total.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::adapters::clock::SystemClock;
use crate::domain::{
    is_valid_timestamp_format, AnonymizedId, BiometricDigest, ClinicalEvent, IdentityRecord,
    LedgerSnapshot, Registration, DEFAULT_TIMESTAMP_FORMAT,
};
use crate::ports::{ClinicalLedger, Clock, IdentityRegistry};

/// Identity Registry backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    identities: Mutex<HashMap<BiometricDigest, IdentityRecord>>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn identities(&self) -> MutexGuard<'_, HashMap<BiometricDigest, IdentityRecord>> {
        self.identities.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IdentityRegistry for InMemoryRegistry {
    fn register(&self, display_name: &str, digest: &BiometricDigest) -> Registration {
        let mut identities = self.identities();

        match identities.entry(digest.clone()) {
            Entry::Occupied(_) => {
                tracing::info!("Registration refused: digest {} already registered", digest.prefix());
                Registration::already_registered()
            }
            Entry::Vacant(slot) => {
                let anonymized_id = AnonymizedId::generate();
                slot.insert(IdentityRecord::new(display_name, anonymized_id.clone()));
                tracing::info!("Registered new identity for digest {}", digest.prefix());
                Registration::registered(anonymized_id)
            }
        }
    }

    fn lookup(&self, digest: &BiometricDigest) -> Option<IdentityRecord> {
        self.identities().get(digest).cloned()
    }

    fn len(&self) -> usize {
        self.identities().len()
    }
}

/// Clinical Ledger backed by a `HashMap` of append-only vectors.
pub struct InMemoryLedger<C: Clock = SystemClock> {
    entries: Mutex<HashMap<AnonymizedId, Vec<ClinicalEvent>>>,
    clock: C,
    timestamp_format: String,
}

impl InMemoryLedger<SystemClock> {
    /// Create an empty ledger stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryLedger<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryLedger<C> {
    /// Create an empty ledger stamped by `clock`.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    /// Override the timestamp format.
    ///
    /// An invalid format is ignored and the default kept.
    #[must_use]
    pub fn timestamp_format(mut self, format: &str) -> Self {
        if is_valid_timestamp_format(format) {
            self.timestamp_format = format.to_string();
        } else {
            tracing::warn!("Ignoring invalid timestamp format, keeping {DEFAULT_TIMESTAMP_FORMAT}");
        }
        self
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<AnonymizedId, Vec<ClinicalEvent>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stamp(&self) -> String {
        self.clock.now().format(&self.timestamp_format).to_string()
    }
}

impl<C: Clock> ClinicalLedger for InMemoryLedger<C> {
    fn append_event(&self, id: &AnonymizedId, detail: &str) {
        // Stamp under the lock so history order matches timestamp order.
        let mut entries = self.entries();
        let event = ClinicalEvent::new(self.stamp(), detail);

        let history = entries.entry(id.clone()).or_default();
        history.push(event);

        tracing::debug!("Appended event #{} for identity {}", history.len(), id.short());
    }

    fn history(&self, id: &AnonymizedId) -> Vec<ClinicalEvent> {
        self.entries().get(id).cloned().unwrap_or_default()
    }

    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            entries: self
                .entries()
                .iter()
                .map(|(id, events)| (id.clone(), events.clone()))
                .collect(),
        }
    }
}

impl<C: Clock> std::fmt::Debug for InMemoryLedger<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedger")
            .field("identities", &self.entries().len())
            .field("timestamp_format", &self.timestamp_format)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::domain::{digest, RegistrationStatus};
    use chrono::{Duration, Local, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc};
    use std::thread;

    fn fixed_clock() -> FixedClock {
        FixedClock::new(
            Local
                .with_ymd_and_hms(2024, 3, 5, 9, 30, 0)
                .single()
                .expect("Valid local time"),
        )
    }

    #[test]
    fn test_register_then_lookup() {
        let registry = InMemoryRegistry::new();
        let d = digest(b"1234");

        assert!(registry.lookup(&d).is_none());
        assert!(registry.is_empty());

        let outcome = registry.register("Alice", &d);
        assert_eq!(outcome.status, RegistrationStatus::Registered);
        let id = outcome.anonymized_id.expect("Should issue id");

        let record = registry.lookup(&d).expect("Should find identity");
        assert_eq!(record.display_name, "Alice");
        assert_eq!(record.anonymized_id, id);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_keeps_original() {
        let registry = InMemoryRegistry::new();
        let d = digest(b"1234");

        let first = registry.register("Alice", &d);
        let second = registry.register("Bob", &d);

        assert_eq!(second, Registration::already_registered());
        let record = registry.lookup(&d).expect("Should find identity");
        assert_eq!(record.display_name, "Alice");
        assert_eq!(Some(record.anonymized_id), first.anonymized_id);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_name_is_stored() {
        let registry = InMemoryRegistry::new();
        let d = digest(b"");

        assert!(registry.register("", &d).is_success());
        assert_eq!(registry.lookup(&d).expect("Should find").display_name, "");
    }

    #[test]
    fn test_distinct_digests_get_distinct_ids() {
        let registry = InMemoryRegistry::new();
        let a = registry.register("A", &digest(b"a")).anonymized_id;
        let b = registry.register("B", &digest(b"b")).anonymized_id;
        assert!(a.is_some() && b.is_some());
        assert_ne!(a, b);
    }

    #[test]
    fn test_concurrent_registration_single_winner() {
        let registry = Arc::new(InMemoryRegistry::new());
        let d = digest(b"shared-digest");

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let d = d.clone();
                thread::spawn(move || registry.register(&format!("patient-{i}"), &d))
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().expect("Thread should not panic"))
            .filter(Registration::is_success)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_history_empty_by_default() {
        let ledger = InMemoryLedger::with_clock(fixed_clock());
        assert!(ledger.history(&AnonymizedId::generate()).is_empty());
        assert!(ledger.snapshot().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let clock = fixed_clock();
        let ledger = InMemoryLedger::with_clock(clock);
        let id = AnonymizedId::generate();

        ledger.append_event(&id, "A");
        ledger.clock.advance(Duration::minutes(5));
        ledger.append_event(&id, "B");

        let history = ledger.history(&id);
        assert_eq!(
            history,
            vec![
                ClinicalEvent::new("05/03 09:30", "A"),
                ClinicalEvent::new("05/03 09:35", "B"),
            ]
        );
    }

    #[test]
    fn test_duplicate_detail_appends_again() {
        let ledger = InMemoryLedger::with_clock(fixed_clock());
        let id = AnonymizedId::generate();

        ledger.append_event(&id, "Control");
        ledger.append_event(&id, "Control");
        ledger.append_event(&id, "");

        assert_eq!(ledger.history(&id).len(), 3);
        assert_eq!(ledger.history(&id)[2].detail, "");
    }

    #[test]
    fn test_custom_timestamp_format() {
        let ledger = InMemoryLedger::with_clock(fixed_clock()).timestamp_format("%Y-%m-%d");
        let id = AnonymizedId::generate();
        ledger.append_event(&id, "Control");
        assert_eq!(ledger.history(&id)[0].timestamp, "2024-03-05");
    }

    #[test]
    fn test_invalid_timestamp_format_falls_back() {
        let ledger = InMemoryLedger::with_clock(fixed_clock()).timestamp_format("%Q");
        let id = AnonymizedId::generate();
        ledger.append_event(&id, "Control");
        assert_eq!(ledger.history(&id)[0].timestamp, "05/03 09:30");
    }

    #[test]
    fn test_entries_are_isolated_per_identity() {
        let ledger = InMemoryLedger::with_clock(fixed_clock());
        let a = AnonymizedId::generate();
        let b = AnonymizedId::generate();

        ledger.append_event(&a, "Fractura de brazo");
        ledger.append_event(&b, "Control");
        ledger.append_event(&b, "Alta");

        assert_eq!(ledger.history(&a).len(), 1);
        assert_eq!(ledger.history(&b).len(), 2);

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.identity_count(), 2);
        assert_eq!(snapshot.event_count(), 3);
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let ledger = Arc::new(InMemoryLedger::with_clock(fixed_clock()));
        let id = AnonymizedId::generate();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                let id = id.clone();
                thread::spawn(move || {
                    for n in 0..50 {
                        ledger.append_event(&id, &format!("t{t}-e{n}"));
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().expect("Thread should not panic");
        }

        assert_eq!(ledger.history(&id).len(), 400);
    }

    /// Clock whose first reading stalls, announcing itself first.
    struct StallingClock {
        start: chrono::DateTime<Local>,
        calls: AtomicUsize,
        entered: Mutex<Option<mpsc::Sender<()>>>,
    }

    impl Clock for StallingClock {
        fn now(&self) -> chrono::DateTime<Local> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                if let Some(tx) = self.entered.lock().expect("Lock").take() {
                    let _ = tx.send(());
                }
                thread::sleep(std::time::Duration::from_millis(300));
            }
            self.start + Duration::minutes(i64::try_from(n).expect("Small count"))
        }
    }

    #[test]
    fn test_racing_appends_stay_chronological() {
        let (tx, rx) = mpsc::channel();
        let clock = StallingClock {
            start: Local
                .with_ymd_and_hms(2024, 3, 5, 9, 30, 0)
                .single()
                .expect("Valid local time"),
            calls: AtomicUsize::new(0),
            entered: Mutex::new(Some(tx)),
        };
        let ledger = Arc::new(InMemoryLedger::with_clock(clock));
        let id = AnonymizedId::generate();

        let slow = {
            let ledger = Arc::clone(&ledger);
            let id = id.clone();
            thread::spawn(move || ledger.append_event(&id, "A"))
        };

        // "A" has read the clock and is stalled; "B" reads it second.
        rx.recv().expect("First append should reach the clock");
        ledger.append_event(&id, "B");
        slow.join().expect("Thread should not panic");

        let history = ledger.history(&id);
        assert_eq!(
            history,
            vec![
                ClinicalEvent::new("05/03 09:30", "A"),
                ClinicalEvent::new("05/03 09:31", "B"),
            ]
        );
    }
}

//! Debounce-Cache mit genau einem Slot
//!
//! Der Cache kennt nur das Ergebnis der *zuletzt abgeschlossenen* Prüfung.
//! Eine neue, andere UID überschreibt den Eintrag sofort. Liest ein zweiter
//! Tag zwischen zwei Scans des ersten, wird der erste deshalb erneut geprüft.
//!
//! Für mehrere gleichzeitige Leser bräuchte es einen mehrzeiligen Cache und
//! eine Queue vor dem Gateway.

use crate::types::{Uid, Verdict};

/// Der einzige Eintrag: UID, Zeitpunkt der Remote-Prüfung, Ergebnis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub uid: Uid,
    pub timestamp_ms: u64,
    pub verdict: Verdict,
}

#[derive(Debug, Clone)]
pub struct DebounceCache {
    window_ms: u64,
    entry: Option<CacheEntry>,
}

impl DebounceCache {
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            entry: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    /// Treffer nur bei gleicher UID und `now - timestamp < window`
    ///
    /// Ein Treffer verlängert das Fenster nicht.
    pub fn lookup(&self, uid: &Uid, now_ms: u64) -> Option<Verdict> {
        let entry = self.entry.as_ref()?;
        if entry.uid != *uid {
            return None;
        }
        // Monotone Zeit; ein Rücksprung zählt als abgelaufen
        let age = now_ms.checked_sub(entry.timestamp_ms)?;
        (age < self.window_ms).then_some(entry.verdict)
    }

    /// Speichert das Ergebnis einer frischen Prüfung (überschreibt immer)
    pub fn store(&mut self, uid: Uid, now_ms: u64, verdict: Verdict) {
        self.entry = Some(CacheEntry {
            uid,
            timestamp_ms: now_ms,
            verdict,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(s: &str) -> Uid {
        Uid::parse(s).unwrap()
    }

    #[test]
    fn test_empty_cache_misses() {
        let cache = DebounceCache::new(1000);
        assert_eq!(cache.lookup(&uid("AABBCCDDEE"), 0), None);
    }

    #[test]
    fn test_hit_inside_window() {
        let mut cache = DebounceCache::new(1000);
        cache.store(uid("AABBCCDDEE"), 100, Verdict::Deny);
        assert_eq!(cache.lookup(&uid("AABBCCDDEE"), 1099), Some(Verdict::Deny));
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let mut cache = DebounceCache::new(1000);
        cache.store(uid("AABBCCDDEE"), 100, Verdict::Accept);
        assert_eq!(cache.lookup(&uid("AABBCCDDEE"), 1100), None);
    }

    #[test]
    fn test_other_uid_misses_and_store_evicts() {
        let mut cache = DebounceCache::new(1000);
        cache.store(uid("AABBCCDDEE"), 0, Verdict::Accept);
        assert_eq!(cache.lookup(&uid("0011223344"), 10), None);

        cache.store(uid("0011223344"), 10, Verdict::Deny);
        assert_eq!(cache.lookup(&uid("AABBCCDDEE"), 20), None);
    }

    #[test]
    fn test_clock_going_backwards_misses() {
        let mut cache = DebounceCache::new(1000);
        cache.store(uid("AABBCCDDEE"), 500, Verdict::Accept);
        assert_eq!(cache.lookup(&uid("AABBCCDDEE"), 400), None);
    }
}

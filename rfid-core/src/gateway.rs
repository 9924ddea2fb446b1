//! Verification Gateway (Gerät B)
//!
//! Ablauf pro fertigem Frame:
//!
//! ```text
//! UID → Cache? ──hit──────────────────────────┐
//!          │                                  │
//!         miss → WLAN verbinden → POST /scan ─┤→ Cache speichern (nur Antworten)
//!                                             ↓
//!                          Ergebnis-Byte an Gerät A
//!                                             ↓
//!                               (Accept) Relay GET, best effort
//! ```
//!
//! Jeder Netzwerkfehler endet als `Verdict::Deny`, wird aber nicht gecacht.
//! Es gibt keine Retries innerhalb eines Frames; der nächste Scan versucht es von vorn.
//! Da immer nur ein Frame in Bearbeitung ist, braucht der Cache keinen Lock.

use crate::cache::DebounceCache;
use crate::traits::{
    AccessAuthority, Connectivity, LinkError, NetError, RelayTrigger, ResultLink,
};
use crate::types::{Uid, Verdict};

/// Woher das Ergebnis stammt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Aus dem Debounce-Cache, kein Netzwerkzugriff
    Cache,
    /// Antwort der Prüfstelle
    Remote,
    /// Netzwerk- oder Protokollfehler, als Deny gewertet
    Failed(NetError),
}

/// Ergebnis des Relay-Aufrufs (beeinflusst nie das Verdict)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStatus {
    NotRequested,
    Triggered,
    Failed(NetError),
}

/// Alles, was bei einem Frame passiert ist (für Logging und Tests)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub verdict: Verdict,
    pub source: Source,
    pub result_sent: Result<(), LinkError>,
    pub relay: RelayStatus,
}

pub struct Gateway<N, A, R> {
    net: N,
    authority: A,
    relay: R,
    cache: DebounceCache,
}

impl<N, A, R> Gateway<N, A, R>
where
    N: Connectivity,
    A: AccessAuthority,
    R: RelayTrigger,
{
    pub fn new(net: N, authority: A, relay: R, window_ms: u64) -> Self {
        Self {
            net,
            authority,
            relay,
            cache: DebounceCache::new(window_ms),
        }
    }

    pub fn cache(&self) -> &DebounceCache {
        &self.cache
    }

    pub fn net(&self) -> &N {
        &self.net
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Prüft eine UID, nutzt den Cache innerhalb des Debounce-Fensters
    pub async fn check(&mut self, uid: &Uid, now_ms: u64) -> Verdict {
        self.evaluate(uid, now_ms).await.0
    }

    /// Wie `check`, liefert zusätzlich die Quelle des Ergebnisses
    pub async fn evaluate(&mut self, uid: &Uid, now_ms: u64) -> (Verdict, Source) {
        if let Some(verdict) = self.cache.lookup(uid, now_ms) {
            return (verdict, Source::Cache);
        }

        match self.remote_check(uid).await {
            Ok(ok) => {
                let verdict = Verdict::from(ok);
                self.cache.store(*uid, now_ms, verdict);
                (verdict, Source::Remote)
            }
            // Fehler landen nicht im Cache, der nächste Scan prüft neu
            Err(e) => (Verdict::Deny, Source::Failed(e)),
        }
    }

    async fn remote_check(&mut self, uid: &Uid) -> Result<bool, NetError> {
        self.net.ensure_connected().await?;
        self.authority.verify(uid).await
    }

    /// Kompletter Ablauf für einen fertigen Frame
    ///
    /// Das Ergebnis-Byte geht immer raus, auch wenn das Netz weg ist.
    /// Das Relay wird nur bei Accept angestoßen, sein Fehler wird ignoriert.
    pub async fn handle_frame<L: ResultLink>(
        &mut self,
        uid: &Uid,
        now_ms: u64,
        link: &mut L,
    ) -> Outcome {
        let (verdict, source) = self.evaluate(uid, now_ms).await;
        let result_sent = link.send_result(verdict).await;

        let relay = if verdict.is_accept() {
            match self.relay.trigger().await {
                Ok(()) => RelayStatus::Triggered,
                Err(e) => RelayStatus::Failed(e),
            }
        } else {
            RelayStatus::NotRequested
        };

        Outcome {
            verdict,
            source,
            result_sent,
            relay,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Source {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Source::Cache => defmt::write!(fmt, "cache hit"),
            Source::Remote => defmt::write!(fmt, "remote check"),
            Source::Failed(e) => defmt::write!(fmt, "failed ({})", e),
        }
    }
}

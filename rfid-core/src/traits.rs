//! Hardware- und Netzwerk-Abstraktion
//!
//! Diese Traits definieren Schnittstellen für Hardware- und Netzwerkzugriff
//! ohne konkrete Implementierung.
//!
//! # Implementierungen
//! - **Production:** `rfid-firmware` (esp-hal LEDC, UART, embassy-net)
//! - **Testing:** Mocks in `rfid-tests`

use crate::types::{Uid, Verdict};

// ============================================================================
// Fehler-Typen
// ============================================================================

/// Fehler beim Schreiben des PWM Duty-Cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    WriteFailed,
}

/// Fehler auf dem seriellen Link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    WriteFailed,
}

/// Netzwerk-Fehler des Gateways
///
/// Jeder dieser Fehler wird im Gateway zu `Verdict::Deny`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// WLAN nicht verbunden bzw. Verbindungsaufbau fehlgeschlagen
    NotConnected,
    DnsFailed,
    ConnectFailed,
    Io,
    Timeout,
    /// HTTP-Status ungleich 200
    Status(u16),
    /// Antwort ohne Status-Zeile oder ohne Erfolgs-Marker
    MalformedReply,
    /// Request passt nicht in den Buffer
    RequestTooLarge,
}

// ============================================================================
// Gerät A
// ============================================================================

/// PWM-Ausgang für die Breathing-LED
pub trait PwmOutput {
    /// Setzt den Duty-Cycle (0..=255)
    fn set_duty(&mut self, duty: u8) -> Result<(), PwmError>;
}

/// Peripherie, die beim Moduswechsel umgeschaltet wird
pub trait ModePeripherals {
    /// ADC free-running Sampling an/aus
    fn set_light_sampling(&mut self, enabled: bool);
    /// Transparente Byte-Bridge Reader → Link an/aus
    fn set_bridge(&mut self, enabled: bool);
}

/// Nicht-blockierende Byte-Quelle (UART RX)
pub trait ByteSource {
    /// Liefert ein Byte falls eins bereitsteht, sonst `None`
    fn poll_byte(&mut self) -> Option<u8>;
}

/// Byte-Senke (UART TX)
pub trait ByteSink {
    fn write_byte(&mut self, byte: u8) -> Result<(), LinkError>;
}

// ============================================================================
// Relay-Gerät
// ============================================================================

/// Schaltausgang des Relays
pub trait RelayOutput {
    fn set_energized(&mut self, energized: bool);
}

// ============================================================================
// Gerät B
// ============================================================================

// Alle Gateway-Traits sind async: auf dem ESP läuft nur ein Embassy-Task,
// jeder Aufruf wird vor dem nächsten Frame vollständig abgeschlossen.

/// Lazy Netzwerk-Verbindung
#[allow(async_fn_in_trait)]
pub trait Connectivity {
    /// Stellt die Verbindung her falls nötig (idempotent, mit Timeout)
    async fn ensure_connected(&mut self) -> Result<(), NetError>;
}

/// Entfernte Prüfstelle (Backend mit Allowlist)
#[allow(async_fn_in_trait)]
pub trait AccessAuthority {
    /// `Ok(true)` nur bei Status 200 und Erfolgs-Marker im Body
    async fn verify(&mut self, uid: &Uid) -> Result<bool, NetError>;
}

/// Entferntes Relay (best effort)
#[allow(async_fn_in_trait)]
pub trait RelayTrigger {
    async fn trigger(&mut self) -> Result<(), NetError>;
}

/// Rückkanal zu Gerät A
#[allow(async_fn_in_trait)]
pub trait ResultLink {
    async fn send_result(&mut self, verdict: Verdict) -> Result<(), LinkError>;
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for NetError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            NetError::NotConnected => defmt::write!(fmt, "not connected"),
            NetError::DnsFailed => defmt::write!(fmt, "DNS failed"),
            NetError::ConnectFailed => defmt::write!(fmt, "connection failed"),
            NetError::Io => defmt::write!(fmt, "I/O error"),
            NetError::Timeout => defmt::write!(fmt, "timeout"),
            NetError::Status(code) => defmt::write!(fmt, "HTTP status {}", code),
            NetError::MalformedReply => defmt::write!(fmt, "malformed reply"),
            NetError::RequestTooLarge => defmt::write!(fmt, "request too large"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LinkError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "link write failed")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PwmError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "PWM write failed")
    }
}

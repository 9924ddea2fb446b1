//! Core Types für Zutrittskontrolle und Breathing-LED
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt;

use crate::config::{
    RESULT_ACCEPT, RESULT_DENY, TICK_FAST_MS, TICK_SLOW_MS, TICK_TURBO_MS, UID_LEN,
};

// ============================================================================
// UID
// ============================================================================

/// Tag-UID: genau 10 ASCII-Hex-Zeichen, immer in Großbuchstaben
///
/// Wird vom Frame-Parser erzeugt und vom Gateway geprüft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uid([u8; UID_LEN]);

/// Fehler beim Parsen einer UID aus einem String
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UidError {
    /// Nicht exakt `UID_LEN` Zeichen
    Length(usize),
    /// Zeichen ist keine Hex-Ziffer
    NotHex(u8),
}

impl Uid {
    /// Baut eine UID aus bereits gesammelten Hex-Bytes
    ///
    /// Kleinbuchstaben werden auf Großbuchstaben gefaltet.
    pub fn from_hex_bytes(bytes: &[u8]) -> Result<Self, UidError> {
        if bytes.len() != UID_LEN {
            return Err(UidError::Length(bytes.len()));
        }

        let mut digits = [0u8; UID_LEN];
        for (slot, &byte) in digits.iter_mut().zip(bytes) {
            if !byte.is_ascii_hexdigit() {
                return Err(UidError::NotHex(byte));
            }
            *slot = byte.to_ascii_uppercase();
        }
        Ok(Self(digits))
    }

    /// Parst eine UID aus einem String (z.B. `"360046d804"`)
    pub fn parse(s: &str) -> Result<Self, UidError> {
        Self::from_hex_bytes(s.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; UID_LEN] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Nur ASCII-Hex im Array, from_utf8 kann nicht fehlschlagen
        core::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Verdict (Ergebnis einer Prüfung)
// ============================================================================

/// Zutritts-Entscheidung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Deny,
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        matches!(self, Verdict::Accept)
    }

    /// Ergebnis-Byte für den Rückkanal zu Gerät A
    pub fn as_byte(self) -> u8 {
        match self {
            Verdict::Accept => RESULT_ACCEPT,
            Verdict::Deny => RESULT_DENY,
        }
    }
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok { Verdict::Accept } else { Verdict::Deny }
    }
}

impl TryFrom<u8> for Verdict {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            RESULT_ACCEPT => Ok(Verdict::Accept),
            RESULT_DENY => Ok(Verdict::Deny),
            other => Err(other),
        }
    }
}

// ============================================================================
// Mode
// ============================================================================

/// Betriebs-Modus von Gerät A
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeState {
    /// Breathing + Lichtsensor aktiv, Bridge aus
    #[default]
    Idle,
    /// Schnelles Breathing, Lichtsensor aus, Bridge aktiv
    Turbo,
}

impl ModeState {
    /// Modus aus dem aktuellen Pegel des Tasters (gedrückt → Turbo)
    pub fn from_held(held: bool) -> Self {
        if held { ModeState::Turbo } else { ModeState::Idle }
    }
}

// ============================================================================
// Tick-Intervall
// ============================================================================

/// Periode zwischen zwei Duty-Cycle Updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickInterval {
    Fast,
    Slow,
    Turbo,
}

impl TickInterval {
    pub fn as_millis(self) -> u32 {
        match self {
            TickInterval::Fast => TICK_FAST_MS,
            TickInterval::Slow => TICK_SLOW_MS,
            TickInterval::Turbo => TICK_TURBO_MS,
        }
    }

    pub fn as_micros(self) -> u64 {
        self.as_millis() as u64 * 1000
    }
}

// ============================================================================
// Duty-Cycle
// ============================================================================

/// Richtung der Helligkeits-Rampe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Aktuelle PWM-Helligkeit plus Richtung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyCycle {
    pub magnitude: u8,
    pub direction: Direction,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Uid {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Verdict {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Verdict::Accept => defmt::write!(fmt, "ACCEPT"),
            Verdict::Deny => defmt::write!(fmt, "DENY"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ModeState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ModeState::Idle => defmt::write!(fmt, "Idle"),
            ModeState::Turbo => defmt::write!(fmt, "Turbo"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TickInterval {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}ms", self.as_millis())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DutyCycle {
    fn format(&self, fmt: defmt::Formatter) {
        let arrow = match self.direction {
            Direction::Up => "↑",
            Direction::Down => "↓",
        };
        defmt::write!(fmt, "{}{}", self.magnitude, arrow)
    }
}

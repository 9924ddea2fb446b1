//! Protokoll- und Timing-Konstanten
//!
//! Werte, die beide Geräte kennen müssen. Hardware-spezifisches (Pins,
//! Baudraten, Buffer) liegt in `rfid-firmware/src/config.rs`.

// ============================================================================
// Link-Frame (Gerät A → Gerät B)
// ============================================================================

/// Start-Byte eines UID-Frames (ASCII STX)
pub const START_MARKER: u8 = 0x02;

/// End-Byte eines UID-Frames (ASCII ETX)
pub const END_MARKER: u8 = 0x03;

/// Anzahl Hex-Zeichen zwischen Start und Ende
pub const UID_LEN: usize = 10;

// ============================================================================
// Ergebnis-Byte (Gerät B → Gerät A)
// ============================================================================

pub const RESULT_ACCEPT: u8 = 0x01;
pub const RESULT_DENY: u8 = 0x00;

// ============================================================================
// Breathing / Tempo
// ============================================================================

/// Untere Grenze des Duty-Cycles (LED nie ganz aus)
pub const DUTY_MIN: u8 = 5;

/// Obere Grenze des Duty-Cycles
pub const DUTY_MAX: u8 = 255;

/// Schrittweite pro Timer-Tick
pub const DUTY_STEP: u8 = 5;

/// Tick-Intervall bei heller Umgebung (Millisekunden)
pub const TICK_FAST_MS: u32 = 10;

/// Tick-Intervall bei dunkler Umgebung (Millisekunden)
pub const TICK_SLOW_MS: u32 = 30;

/// Tick-Intervall im Turbo-Modus (Millisekunden)
pub const TICK_TURBO_MS: u32 = 2;

/// Helligkeits-Schwelle für den ADC-Wert (12 Bit, 0..=4095)
/// Werte > Schwelle gelten als hell → schnelles Atmen
pub const LIGHT_THRESHOLD: u16 = 2048;

// ============================================================================
// Verification Gateway
// ============================================================================

/// Zeitfenster, in dem dieselbe UID das letzte Ergebnis wiederverwendet
pub const DEBOUNCE_WINDOW_MS: u64 = 3000;

/// Erfolgs-Marker, der byte-genau im Response-Body stehen muss
pub const SUCCESS_MARKER: &[u8] = b"\"ok\":true";

// ============================================================================
// Relay
// ============================================================================

/// Dauer eines `/relay_open` Pulses
pub const RELAY_PULSE_MS: u64 = 1000;

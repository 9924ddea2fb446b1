// Library-Root: Hardware-Adapter und Embassy Tasks der drei Geräte
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von rfid-core
pub use rfid_core::RelayCommand;

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Statt:  Sender<'static, NoopRawMutex, RelayCommand, 4>
// Nutze:  RelayCommandSender

/// Channel für Relay-Kommandos (HTTP Server → Relay Task)
/// - 4: Kapazität, schnell hintereinander eintreffende Requests gehen nicht verloren
pub type RelayCommandChannel = Channel<NoopRawMutex, RelayCommand, 4>;

/// Sender für Relay-Kommandos (HTTP Handler)
pub type RelayCommandSender = Sender<'static, NoopRawMutex, RelayCommand, 4>;

/// Receiver für Relay-Kommandos (Relay Task)
pub type RelayCommandReceiver = Receiver<'static, NoopRawMutex, RelayCommand, 4>;

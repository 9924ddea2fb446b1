//! RFID Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Zustandsautomaten und Protokolle für:
//! - **Gerät A:** Breathing-LED, Lichtsensor-Tempo, Idle/Turbo Mode-Switch, Byte-Bridge
//! - **Gerät B:** UID-Frame Parser, Debounce-Cache, Verification Gateway
//! - **Relay:** Kommandos des Relay-Geräts

#![no_std]

pub mod breathing;
pub mod bridge;
pub mod cache;
pub mod config;
pub mod frame;
pub mod gateway;
pub mod http;
pub mod mode;
pub mod relay;
pub mod shared;
pub mod tempo;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use breathing::{BreathingConfig, BreathingEngine};
pub use cache::{CacheEntry, DebounceCache};
pub use frame::{FrameParser, ParserState};
pub use gateway::{Gateway, Outcome, RelayStatus, Source};
pub use mode::ModeSwitch;
pub use relay::RelayCommand;
pub use shared::{Mailbox, Shared};
pub use tempo::TempoControl;
pub use traits::{
    AccessAuthority, ByteSink, ByteSource, Connectivity, LinkError, ModePeripherals, NetError,
    PwmError, PwmOutput, RelayOutput, RelayTrigger, ResultLink,
};
pub use types::{Direction, DutyCycle, ModeState, TickInterval, Uid, Verdict};

//! Mock-Hardware und Mock-Netzwerk für Host-Tests
//!
//! Alle Mocks zeichnen auf, was mit ihnen passiert ist, damit die Tests
//! gegen die Aufrufe asserten können.

use std::collections::VecDeque;

use rfid_core::{
    AccessAuthority, ByteSink, ByteSource, Connectivity, LinkError, ModePeripherals, NetError,
    PwmError, PwmOutput, RelayOutput, RelayTrigger, ResultLink, Uid, Verdict,
};

// ============================================================================
// Gerät A
// ============================================================================

#[derive(Default)]
pub struct MockPwm {
    /// Zuletzt geschriebener Duty-Cycle
    pub last_duty: Option<u8>,
    pub write_count: usize,
    /// Simuliere Fehler beim nächsten set_duty()
    pub fail_next_write: bool,
}

impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PwmOutput for MockPwm {
    fn set_duty(&mut self, duty: u8) -> Result<(), PwmError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(PwmError::WriteFailed);
        }
        self.last_duty = Some(duty);
        self.write_count += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct MockPeripherals {
    pub sampling: Option<bool>,
    pub bridge: Option<bool>,
    pub switch_count: usize,
}

impl ModePeripherals for MockPeripherals {
    fn set_light_sampling(&mut self, enabled: bool) {
        self.sampling = Some(enabled);
        self.switch_count += 1;
    }

    fn set_bridge(&mut self, enabled: bool) {
        self.bridge = Some(enabled);
        self.switch_count += 1;
    }
}

/// UART-Ersatz: `rx` wird gelesen, `tx` sammelt geschriebene Bytes
#[derive(Default)]
pub struct MockSerial {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    /// Schreibfehler ab dem n-ten Byte
    pub fail_after: Option<usize>,
}

impl MockSerial {
    pub fn with_input(bytes: &[u8]) -> Self {
        Self {
            rx: bytes.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl ByteSource for MockSerial {
    fn poll_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

impl ByteSink for MockSerial {
    fn write_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        if self.fail_after.is_some_and(|n| self.tx.len() >= n) {
            return Err(LinkError::WriteFailed);
        }
        self.tx.push(byte);
        Ok(())
    }
}

// ============================================================================
// Gerät B
// ============================================================================

/// WLAN-Ersatz
pub struct MockNet {
    pub reachable: bool,
    pub connected: bool,
    pub connect_attempts: usize,
}

impl MockNet {
    pub fn online() -> Self {
        Self {
            reachable: true,
            connected: false,
            connect_attempts: 0,
        }
    }

    pub fn offline() -> Self {
        Self {
            reachable: false,
            ..Self::online()
        }
    }
}

impl Connectivity for MockNet {
    async fn ensure_connected(&mut self) -> Result<(), NetError> {
        if self.connected {
            return Ok(());
        }
        self.connect_attempts += 1;
        if self.reachable {
            self.connected = true;
            Ok(())
        } else {
            Err(NetError::NotConnected)
        }
    }
}

/// Backend-Ersatz: Antworten werden der Reihe nach verbraucht,
/// danach gilt `default`
pub struct MockAuthority {
    pub replies: VecDeque<Result<bool, NetError>>,
    pub default: Result<bool, NetError>,
    pub calls: Vec<Uid>,
}

impl MockAuthority {
    pub fn always(reply: Result<bool, NetError>) -> Self {
        Self {
            replies: VecDeque::new(),
            default: reply,
            calls: Vec::new(),
        }
    }

    pub fn sequence(replies: &[Result<bool, NetError>]) -> Self {
        Self {
            replies: replies.iter().copied().collect(),
            default: Ok(false),
            calls: Vec::new(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }
}

impl AccessAuthority for MockAuthority {
    async fn verify(&mut self, uid: &Uid) -> Result<bool, NetError> {
        self.calls.push(*uid);
        self.replies.pop_front().unwrap_or(self.default)
    }
}

#[derive(Default)]
pub struct MockRelay {
    pub triggers: usize,
    pub fail: bool,
}

impl RelayTrigger for MockRelay {
    async fn trigger(&mut self) -> Result<(), NetError> {
        self.triggers += 1;
        if self.fail {
            Err(NetError::ConnectFailed)
        } else {
            Ok(())
        }
    }
}

/// Rückkanal-Ersatz: sammelt gesendete Ergebnis-Bytes
#[derive(Default)]
pub struct MockLink {
    pub sent: Vec<u8>,
    pub fail: bool,
}

impl ResultLink for MockLink {
    async fn send_result(&mut self, verdict: Verdict) -> Result<(), LinkError> {
        if self.fail {
            return Err(LinkError::WriteFailed);
        }
        self.sent.push(verdict.as_byte());
        Ok(())
    }
}

// ============================================================================
// Relay-Gerät
// ============================================================================

/// Relay-Ausgang, der jede Pegeländerung mitschreibt
#[derive(Default)]
pub struct MockRelayOutput {
    pub levels: Vec<bool>,
}

impl MockRelayOutput {
    pub fn energized(&self) -> bool {
        self.levels.last().copied().unwrap_or(false)
    }
}

impl RelayOutput for MockRelayOutput {
    fn set_energized(&mut self, energized: bool) {
        self.levels.push(energized);
    }
}

// UART Adapter für Reader, Byte-Bridge und Ergebnis-Rückkanal
//
// - Gerät A (blocking): `UartSource` / `UartSink` für `bridge::pump`
// - Gerät B (async):    `AsyncLink` sendet das Ergebnis-Byte an Gerät A

use esp_hal::uart::{UartRx, UartTx};
use esp_hal::{Async, Blocking};
use rfid_core::{ByteSink, ByteSource, LinkError, ResultLink, Verdict};

/// Nicht-blockierende Byte-Quelle über UART RX
pub struct UartSource<'d> {
    rx: UartRx<'d, Blocking>,
}

impl<'d> UartSource<'d> {
    pub fn new(rx: UartRx<'d, Blocking>) -> Self {
        Self { rx }
    }
}

impl ByteSource for UartSource<'_> {
    fn poll_byte(&mut self) -> Option<u8> {
        if !self.rx.read_ready() {
            return None;
        }

        let mut byte = [0u8; 1];
        match self.rx.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            // Framing-/Overflow-Fehler: Byte verwerfen, der Parser auf Gerät B resynchronisiert
            _ => None,
        }
    }
}

/// Byte-Senke über UART TX
pub struct UartSink<'d> {
    tx: UartTx<'d, Blocking>,
}

impl<'d> UartSink<'d> {
    pub fn new(tx: UartTx<'d, Blocking>) -> Self {
        Self { tx }
    }
}

impl ByteSink for UartSink<'_> {
    fn write_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        match self.tx.write(&[byte]) {
            Ok(1) => Ok(()),
            _ => Err(LinkError::WriteFailed),
        }
    }
}

/// Rückkanal von Gerät B zu Gerät A (ein Byte pro Frame)
pub struct AsyncLink<'d> {
    tx: UartTx<'d, Async>,
}

impl<'d> AsyncLink<'d> {
    pub fn new(tx: UartTx<'d, Async>) -> Self {
        Self { tx }
    }
}

impl ResultLink for AsyncLink<'_> {
    async fn send_result(&mut self, verdict: Verdict) -> Result<(), LinkError> {
        match self.tx.write_async(&[verdict.as_byte()]).await {
            Ok(1) => {}
            _ => return Err(LinkError::WriteFailed),
        }
        self.tx
            .flush_async()
            .await
            .map_err(|_| LinkError::WriteFailed)
    }
}

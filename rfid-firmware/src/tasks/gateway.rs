// Gateway Task - Gerät B: Frames vom Link lesen, prüfen, Ergebnis zurücksenden
use defmt::{debug, info, warn};
use embassy_time::Instant;
use esp_hal::Async;
use esp_hal::uart::UartRx;
use rfid_core::config::DEBOUNCE_WINDOW_MS;
use rfid_core::{
    AccessAuthority, Connectivity, FrameParser, Gateway, Outcome, RelayStatus, RelayTrigger,
    ResultLink, Uid,
};

use crate::config::UART_READ_BUFFER_SIZE;
use crate::hal::AsyncLink;
use crate::tasks::client::{HttpAuthority, HttpRelay};
use crate::tasks::wifi::WifiLink;

/// Gateway Logic - Testbare Ablaufsteuerung ohne UART
///
/// Verarbeitet einen Block empfangener Bytes. Jede fertige UID wird
/// vollständig abgearbeitet (Prüfung, Ergebnis-Byte, Relay), bevor das
/// nächste Byte in den Parser geht.
pub async fn process_bytes<N, A, R, L>(
    bytes: &[u8],
    parser: &mut FrameParser,
    gateway: &mut Gateway<N, A, R>,
    link: &mut L,
) where
    N: Connectivity,
    A: AccessAuthority,
    R: RelayTrigger,
    L: ResultLink,
{
    for &byte in bytes {
        if let Some(uid) = parser.push(byte) {
            let now_ms = Instant::now().as_millis();
            let outcome = gateway.handle_frame(&uid, now_ms, link).await;
            log_outcome(&uid, &outcome);
        }
    }
}

fn log_outcome(uid: &Uid, outcome: &Outcome) {
    info!(
        "Gateway: UID {} → {} ({})",
        uid, outcome.verdict, outcome.source
    );

    if let Err(e) = outcome.result_sent {
        warn!("Gateway: Result byte not sent: {}", e);
    }

    match outcome.relay {
        RelayStatus::NotRequested => {}
        RelayStatus::Triggered => debug!("Gateway: Relay triggered"),
        RelayStatus::Failed(e) => warn!("Gateway: Relay trigger failed (ignored): {}", e),
    }
}

/// Gateway Task - Embassy Task für Gerät B
///
/// # Parameter
/// - `rx`: UART RX vom Link (Frames von Gerät A)
/// - `link`: UART TX zurück zu Gerät A
/// - `wifi`: lazy WiFi-Verbindung
/// - `authority`: Backend-Prüfung
/// - `relay`: Relay-Aufruf
#[embassy_executor::task]
pub async fn gateway_task(
    mut rx: UartRx<'static, Async>,
    mut link: AsyncLink<'static>,
    wifi: WifiLink,
    authority: HttpAuthority,
    relay: HttpRelay,
) {
    info!("Gateway: Waiting for frames...");

    let mut gateway = Gateway::new(wifi, authority, relay, DEBOUNCE_WINDOW_MS);
    let mut parser = FrameParser::new();
    let mut buffer = [0u8; UART_READ_BUFFER_SIZE];

    loop {
        match rx.read_async(&mut buffer).await {
            Ok(n) => process_bytes(&buffer[..n], &mut parser, &mut gateway, &mut link).await,
            Err(e) => {
                // Bytes verloren: laufenden Frame verwerfen
                debug!("Gateway: UART read error {}, resync", e);
                parser.reset();
            }
        }
    }
}

// HTTP Client - Backend-Prüfung und Relay-Aufruf für Gerät B
//
// Ein Request pro TCP-Verbindung (HTTP/1.0, Connection: close).
// Die Antwort wird gestreamt, nie komplett gepuffert.
use defmt::{Debug2Format, debug, warn};
use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::TcpSocket;
use embassy_net::{IpAddress, Ipv4Address, Stack};
use embassy_time::{Duration, with_timeout};
use heapless::String;
use rfid_core::config::SUCCESS_MARKER;
use rfid_core::http::{Endpoint, ResponseScanner, ScanRequest, write_get, write_post};
use rfid_core::{AccessAuthority, NetError, RelayTrigger, Uid};

use crate::config::*;

/// Löst einen Hostnamen auf, IP-Literale werden direkt übernommen
async fn resolve_host(stack: Stack<'static>, host: &str) -> Result<Ipv4Address, NetError> {
    if let Ok(ip) = host.parse::<Ipv4Address>() {
        return Ok(ip);
    }

    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(host, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(*ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(NetError::DnsFailed),
        Ok(Err(_)) => Err(NetError::DnsFailed),
        Err(_) => Err(NetError::Timeout),
    }
}

/// Sendet `request` und reicht jeden empfangenen Chunk an `on_chunk` weiter
///
/// Liest bis der Server die Verbindung schließt.
async fn exchange(
    stack: Stack<'static>,
    host: &str,
    port: u16,
    request: &[u8],
    mut on_chunk: impl FnMut(&[u8]),
) -> Result<(), NetError> {
    let ip = resolve_host(stack, host).await?;
    debug!("HTTP: {} resolved to {}", host, Debug2Format(&ip));

    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];
    let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)));

    socket
        .connect((ip, port))
        .await
        .map_err(|_| NetError::ConnectFailed)?;

    let mut sent = 0;
    while sent < request.len() {
        match socket.write(&request[sent..]).await {
            Ok(0) | Err(_) => return Err(NetError::Io),
            Ok(n) => sent += n,
        }
    }
    socket.flush().await.map_err(|_| NetError::Io)?;

    let mut chunk = [0u8; HTTP_READ_CHUNK_SIZE];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => on_chunk(&chunk[..n]),
            Err(_) => return Err(NetError::Io),
        }
    }

    socket.close();
    Ok(())
}

// ============================================================================
// Backend-Prüfung
// ============================================================================

/// Prüft UIDs per `POST {"uid":"..."}` gegen das Backend
pub struct HttpAuthority {
    stack: Stack<'static>,
    endpoint: Endpoint<'static>,
}

impl HttpAuthority {
    pub fn new(stack: Stack<'static>, endpoint: Endpoint<'static>) -> Self {
        Self { stack, endpoint }
    }

    async fn post_scan(&self, uid: &Uid) -> Result<bool, NetError> {
        let mut body = [0u8; JSON_BODY_BUFFER_SIZE];
        let len = ScanRequest::new(uid).to_json(&mut body)?;
        let body = core::str::from_utf8(&body[..len]).map_err(|_| NetError::RequestTooLarge)?;

        let mut request: String<HTTP_REQUEST_BUFFER_SIZE> = String::new();
        write_post(
            &mut request,
            self.endpoint.host,
            self.endpoint.port,
            self.endpoint.path,
            body,
        )?;

        let mut scanner = ResponseScanner::with_marker(SUCCESS_MARKER);
        exchange(
            self.stack,
            self.endpoint.host,
            self.endpoint.port,
            request.as_bytes(),
            |chunk| scanner.feed(chunk),
        )
        .await?;

        scanner.finish()
    }
}

impl AccessAuthority for HttpAuthority {
    async fn verify(&mut self, uid: &Uid) -> Result<bool, NetError> {
        match with_timeout(Duration::from_secs(HTTP_TIMEOUT_SECS), self.post_scan(uid)).await {
            Ok(result) => result,
            Err(_) => Err(NetError::Timeout),
        }
    }
}

// ============================================================================
// Relay
// ============================================================================

/// Ruft den Relay-Pfad per `GET` auf, die Antwort wird nicht ausgewertet
pub struct HttpRelay {
    stack: Stack<'static>,
    host: &'static str,
    port: u16,
    path: &'static str,
}

impl HttpRelay {
    pub fn new(stack: Stack<'static>, host: &'static str, port: u16, path: &'static str) -> Self {
        Self {
            stack,
            host,
            port,
            path,
        }
    }

    async fn get(&self) -> Result<(), NetError> {
        let mut request: String<HTTP_REQUEST_BUFFER_SIZE> = String::new();
        write_get(&mut request, self.host, self.port, self.path)?;
        exchange(self.stack, self.host, self.port, request.as_bytes(), |_| {}).await
    }
}

impl RelayTrigger for HttpRelay {
    async fn trigger(&mut self) -> Result<(), NetError> {
        match with_timeout(Duration::from_secs(RELAY_TIMEOUT_SECS), self.get()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                warn!("Relay: Request to {}{} failed: {}", self.host, self.path, e);
                Err(e)
            }
            Err(_) => {
                warn!("Relay: Request to {}{} timed out", self.host, self.path);
                Err(NetError::Timeout)
            }
        }
    }
}

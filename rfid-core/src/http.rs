//! Minimaler HTTP/1.0 Client-Teil für das Gateway
//!
//! Nur was Gerät B braucht:
//! - JSON-Body `{"uid":"…"}` bauen (serde-json-core)
//! - POST/GET Requests in einen festen Buffer schreiben
//! - Antwort-Stream in beliebigen Chunks scannen: Status-Code und
//!   Erfolgs-Marker im Body, auch wenn der Marker über eine Chunk-Grenze geht
//!
//! HTTP/1.0 mit `Connection: close`, damit der Server nie chunked antwortet
//! und das Ende der Antwort einfach das Schließen der Verbindung ist.

use core::fmt::Write;

use heapless::{String, Vec};
use serde::Serialize;

use crate::config::SUCCESS_MARKER;
use crate::traits::NetError;
use crate::types::Uid;

/// Request-Body für `POST /api/scan`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanRequest<'a> {
    pub uid: &'a str,
}

impl<'a> ScanRequest<'a> {
    pub fn new(uid: &'a Uid) -> Self {
        Self { uid: uid.as_str() }
    }

    /// Serialisiert den Body in `buf`, gibt die Länge zurück
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, NetError> {
        serde_json_core::to_slice(self, buf).map_err(|_| NetError::RequestTooLarge)
    }
}

// ============================================================================
// Endpoint
// ============================================================================

/// Zerlegte `http://host[:port]/path` URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointError {
    /// Nur `http://` wird unterstützt
    UnsupportedScheme,
    EmptyHost,
    InvalidPort,
}

impl<'a> Endpoint<'a> {
    pub fn parse(url: &'a str) -> Result<Self, EndpointError> {
        let rest = url
            .strip_prefix("http://")
            .ok_or(EndpointError::UnsupportedScheme)?;

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (
                host,
                port.parse::<u16>().map_err(|_| EndpointError::InvalidPort)?,
            ),
            None => (authority, 80),
        };

        if host.is_empty() {
            return Err(EndpointError::EmptyHost);
        }

        Ok(Self { host, port, path })
    }
}

// ============================================================================
// Requests
// ============================================================================

fn write_host_header<const N: usize>(
    out: &mut String<N>,
    host: &str,
    port: u16,
) -> core::fmt::Result {
    if port == 80 {
        write!(out, "Host: {}\r\n", host)
    } else {
        write!(out, "Host: {}:{}\r\n", host, port)
    }
}

fn write_post_head<const N: usize>(
    out: &mut String<N>,
    host: &str,
    port: u16,
    path: &str,
    body: &str,
) -> core::fmt::Result {
    write!(out, "POST {} HTTP/1.0\r\n", path)?;
    write_host_header(out, host, port)?;
    out.write_str("Content-Type: application/json\r\n")?;
    write!(out, "Content-Length: {}\r\n", body.len())?;
    out.write_str("Connection: close\r\n\r\n")?;
    out.write_str(body)
}

fn write_get_head<const N: usize>(
    out: &mut String<N>,
    host: &str,
    port: u16,
    path: &str,
) -> core::fmt::Result {
    write!(out, "GET {} HTTP/1.0\r\n", path)?;
    write_host_header(out, host, port)?;
    out.write_str("Connection: close\r\n\r\n")
}

/// POST mit JSON-Body
pub fn write_post<const N: usize>(
    out: &mut String<N>,
    host: &str,
    port: u16,
    path: &str,
    body: &str,
) -> Result<(), NetError> {
    out.clear();
    write_post_head(out, host, port, path, body).map_err(|_| NetError::RequestTooLarge)
}

/// GET ohne Body
pub fn write_get<const N: usize>(
    out: &mut String<N>,
    host: &str,
    port: u16,
    path: &str,
) -> Result<(), NetError> {
    out.clear();
    write_get_head(out, host, port, path).map_err(|_| NetError::RequestTooLarge)
}

// ============================================================================
// Marker-Suche (KMP, streaming)
// ============================================================================

pub const MAX_MARKER_LEN: usize = 32;

/// Sucht ein festes Byte-Muster in einem Stream, Byte für Byte
#[derive(Debug, Clone)]
pub struct MarkerSearch {
    pattern: &'static [u8],
    fail: [usize; MAX_MARKER_LEN],
    matched: usize,
    found: bool,
}

impl MarkerSearch {
    /// Panics, wenn das Muster länger als `MAX_MARKER_LEN` ist
    pub fn new(pattern: &'static [u8]) -> Self {
        assert!(
            pattern.len() <= MAX_MARKER_LEN,
            "marker longer than MAX_MARKER_LEN"
        );

        let mut fail = [0usize; MAX_MARKER_LEN];
        let mut k = 0;
        for i in 1..pattern.len() {
            while k > 0 && pattern[i] != pattern[k] {
                k = fail[k - 1];
            }
            if pattern[i] == pattern[k] {
                k += 1;
            }
            fail[i] = k;
        }

        Self {
            pattern,
            fail,
            matched: 0,
            found: pattern.is_empty(),
        }
    }

    pub fn push(&mut self, byte: u8) {
        if self.found {
            return;
        }
        while self.matched > 0 && self.pattern[self.matched] != byte {
            self.matched = self.fail[self.matched - 1];
        }
        if self.pattern[self.matched] == byte {
            self.matched += 1;
        }
        if self.matched == self.pattern.len() {
            self.found = true;
        }
    }

    pub fn found(&self) -> bool {
        self.found
    }
}

// ============================================================================
// Response-Scanner
// ============================================================================

const STATUS_LINE_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    StatusLine,
    Headers { line_len: usize },
    Body,
}

/// Streaming-Auswertung einer HTTP-Antwort
#[derive(Debug, Clone)]
pub struct ResponseScanner {
    phase: Phase,
    status_line: Vec<u8, STATUS_LINE_LEN>,
    status: Option<u16>,
    marker: MarkerSearch,
}

impl ResponseScanner {
    pub fn new() -> Self {
        Self::with_marker(SUCCESS_MARKER)
    }

    pub fn with_marker(marker: &'static [u8]) -> Self {
        Self {
            phase: Phase::StatusLine,
            status_line: Vec::new(),
            status: None,
            marker: MarkerSearch::new(marker),
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            self.push(byte);
        }
    }

    fn push(&mut self, byte: u8) {
        match self.phase {
            Phase::StatusLine => {
                if byte == b'\n' {
                    self.status = parse_status_line(&self.status_line);
                    self.phase = Phase::Headers { line_len: 0 };
                } else if byte != b'\r' {
                    // Überlange Status-Zeile: Rest ignorieren, Code steht vorne
                    let _ = self.status_line.push(byte);
                }
            }
            Phase::Headers { line_len } => match byte {
                b'\n' if line_len == 0 => self.phase = Phase::Body,
                b'\n' => self.phase = Phase::Headers { line_len: 0 },
                b'\r' => {}
                _ => {
                    self.phase = Phase::Headers {
                        line_len: line_len + 1,
                    }
                }
            },
            Phase::Body => self.marker.push(byte),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn marker_found(&self) -> bool {
        self.marker.found()
    }

    /// Status 200 UND Marker im Body
    pub fn is_success(&self) -> bool {
        self.status == Some(200) && self.marker_found()
    }

    /// Ergebnis nach Verbindungsende
    ///
    /// - keine Status-Zeile → `MalformedReply`
    /// - Status ≠ 200 → `Status(code)`
    /// - 200 → `Ok(marker gefunden)`
    pub fn finish(&self) -> Result<bool, NetError> {
        match self.status {
            None => Err(NetError::MalformedReply),
            Some(200) => Ok(self.marker_found()),
            Some(code) => Err(NetError::Status(code)),
        }
    }
}

impl Default for ResponseScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// `HTTP/1.1 200 OK` → `Some(200)`
fn parse_status_line(line: &[u8]) -> Option<u16> {
    let line = core::str::from_utf8(line).ok()?;
    let mut parts = line.split_ascii_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_request_json() {
        let uid = Uid::parse("360046D804").unwrap();
        let mut buf = [0u8; 64];
        let n = ScanRequest::new(&uid).to_json(&mut buf).unwrap();
        assert_eq!(&buf[..n], br#"{"uid":"360046D804"}"#);
    }

    #[test]
    fn test_scan_request_buffer_too_small() {
        let uid = Uid::parse("360046D804").unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(
            ScanRequest::new(&uid).to_json(&mut buf),
            Err(NetError::RequestTooLarge)
        );
    }

    #[test]
    fn test_endpoint_parse() {
        let ep = Endpoint::parse("http://192.168.1.10:8000/api/scan").unwrap();
        assert_eq!(ep.host, "192.168.1.10");
        assert_eq!(ep.port, 8000);
        assert_eq!(ep.path, "/api/scan");

        let ep = Endpoint::parse("http://relay.local").unwrap();
        assert_eq!(ep.port, 80);
        assert_eq!(ep.path, "/");

        assert_eq!(
            Endpoint::parse("https://x/"),
            Err(EndpointError::UnsupportedScheme)
        );
        assert_eq!(Endpoint::parse("http://:80/"), Err(EndpointError::EmptyHost));
        assert_eq!(
            Endpoint::parse("http://x:99999/"),
            Err(EndpointError::InvalidPort)
        );
    }

    #[test]
    fn test_write_post() {
        let mut out: String<256> = String::new();
        write_post(&mut out, "10.0.0.2", 8000, "/api/scan", r#"{"uid":"AABBCCDDEE"}"#).unwrap();
        assert!(out.starts_with("POST /api/scan HTTP/1.0\r\nHost: 10.0.0.2:8000\r\n"));
        assert!(out.contains("Content-Length: 20\r\n"));
        assert!(out.ends_with("\r\n\r\n{\"uid\":\"AABBCCDDEE\"}"));
    }

    #[test]
    fn test_write_get_overflow() {
        let mut out: String<16> = String::new();
        assert_eq!(
            write_get(&mut out, "relay", 80, "/relay_open"),
            Err(NetError::RequestTooLarge)
        );
    }

    #[test]
    fn test_marker_search_overlapping_prefix() {
        // '"' kommt im Muster zweimal vor
        let mut search = MarkerSearch::new(SUCCESS_MARKER);
        for &b in br#"{"ok""ok":true}"# {
            search.push(b);
        }
        assert!(search.found());
    }

    #[test]
    fn test_marker_search_at_length_limit() {
        static MARKER: [u8; MAX_MARKER_LEN] = [b'x'; MAX_MARKER_LEN];
        let mut search = MarkerSearch::new(&MARKER);
        for _ in 0..MAX_MARKER_LEN - 1 {
            search.push(b'x');
        }
        assert!(!search.found());
        search.push(b'x');
        assert!(search.found());
    }

    #[test]
    #[should_panic(expected = "marker longer than MAX_MARKER_LEN")]
    fn test_marker_search_rejects_overlong_pattern() {
        static MARKER: [u8; MAX_MARKER_LEN + 1] = [b'x'; MAX_MARKER_LEN + 1];
        MarkerSearch::new(&MARKER);
    }

    #[test]
    fn test_scanner_success() {
        let mut scanner = ResponseScanner::new();
        scanner.feed(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\r\n{\"ok\":true}");
        assert_eq!(scanner.status(), Some(200));
        assert!(scanner.is_success());
        assert_eq!(scanner.finish(), Ok(true));
    }

    #[test]
    fn test_scanner_marker_split_across_chunks() {
        let mut scanner = ResponseScanner::new();
        scanner.feed(b"HTTP/1.0 200 OK\r\n\r\n{\"o");
        scanner.feed(b"k\":tr");
        scanner.feed(b"ue}");
        assert!(scanner.is_success());
    }

    #[test]
    fn test_scanner_marker_in_header_does_not_count() {
        let mut scanner = ResponseScanner::new();
        scanner.feed(b"HTTP/1.0 200 OK\r\nX-Debug: \"ok\":true\r\n\r\n{\"ok\":false}");
        assert_eq!(scanner.finish(), Ok(false));
    }

    #[test]
    fn test_scanner_non_200() {
        let mut scanner = ResponseScanner::new();
        scanner.feed(b"HTTP/1.1 500 Internal Server Error\r\n\r\n{\"ok\":true}");
        assert!(!scanner.is_success());
        assert_eq!(scanner.finish(), Err(NetError::Status(500)));
    }

    #[test]
    fn test_scanner_garbage() {
        let mut scanner = ResponseScanner::new();
        scanner.feed(b"hello world\r\n");
        assert_eq!(scanner.finish(), Err(NetError::MalformedReply));

        let empty = ResponseScanner::new();
        assert_eq!(empty.finish(), Err(NetError::MalformedReply));
    }
}

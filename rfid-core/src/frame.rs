//! UID-Frame Parser
//!
//! Frame-Format auf dem Link:
//!
//! ```text
//! 0x02 | 10 x ASCII-Hex | 0x03
//! ```
//!
//! Zustandsautomat mit zwei Zuständen:
//!
//! | Zustand        | Byte              | Aktion                                  |
//! |----------------|-------------------|-----------------------------------------|
//! | `WaitStart`    | `0x02`            | Buffer leeren → `ReadPayload`           |
//! | `WaitStart`    | sonst             | ignorieren                              |
//! | `ReadPayload`  | `0x02`            | Buffer leeren, neu beginnen             |
//! | `ReadPayload`  | `0x03`            | genau 10 Zeichen → UID, sonst verwerfen |
//! | `ReadPayload`  | Hex, < 10 Zeichen | groß schreiben und anhängen             |
//! | `ReadPayload`  | Hex, 11. Zeichen  | Überlauf → `WaitStart`                  |
//! | `ReadPayload`  | sonst             | Frame ungültig → `WaitStart`            |
//!
//! Fehler werden nie gemeldet, der Parser synchronisiert sich einfach neu.

use heapless::Vec;

use crate::config::{END_MARKER, START_MARKER, UID_LEN};
use crate::types::Uid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    WaitStart,
    ReadPayload,
}

#[derive(Debug, Clone, Default)]
pub struct FrameParser {
    payload: Vec<u8, UID_LEN>,
    reading: bool,
}

impl FrameParser {
    pub const fn new() -> Self {
        Self {
            payload: Vec::new(),
            reading: false,
        }
    }

    pub fn state(&self) -> ParserState {
        if self.reading {
            ParserState::ReadPayload
        } else {
            ParserState::WaitStart
        }
    }

    pub fn reset(&mut self) {
        self.payload.clear();
        self.reading = false;
    }

    /// Verarbeitet ein Byte, liefert eine UID sobald ein Frame gültig endet
    pub fn push(&mut self, byte: u8) -> Option<Uid> {
        if byte == START_MARKER {
            self.payload.clear();
            self.reading = true;
            return None;
        }

        if !self.reading {
            return None;
        }

        if byte == END_MARKER {
            let uid = Uid::from_hex_bytes(&self.payload).ok();
            self.reset();
            return uid;
        }

        if !byte.is_ascii_hexdigit() {
            self.reset();
            return None;
        }

        if self.payload.push(byte.to_ascii_uppercase()).is_err() {
            // 11. Payload-Byte vor dem End-Marker
            self.reset();
        }
        None
    }

    /// Verarbeitet einen ganzen Chunk und liefert alle darin fertigen UIDs
    pub fn feed<'a>(&'a mut self, bytes: &'a [u8]) -> impl Iterator<Item = Uid> + 'a {
        bytes.iter().filter_map(move |&byte| self.push(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(payload: &[u8]) -> Vec<u8, 32> {
        let mut bytes = Vec::new();
        bytes.push(START_MARKER).unwrap();
        bytes.extend_from_slice(payload).unwrap();
        bytes.push(END_MARKER).unwrap();
        bytes
    }

    #[test]
    fn test_valid_frame() {
        let mut parser = FrameParser::new();
        let uids: Vec<Uid, 4> = parser.feed(&frame(b"360046D804")).collect();
        assert_eq!(uids.len(), 1);
        assert_eq!(uids[0].as_str(), "360046D804");
        assert_eq!(parser.state(), ParserState::WaitStart);
    }

    #[test]
    fn test_lowercase_is_folded() {
        let mut parser = FrameParser::new();
        let uid = parser.feed(&frame(b"360046d804")).next();
        assert_eq!(uid.map(|u| u.as_str() == "360046D804"), Some(true));
    }

    #[test]
    fn test_non_hex_resyncs() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(&frame(b"36Z046D804")).count(), 0);
        assert_eq!(parser.state(), ParserState::WaitStart);
    }

    #[test]
    fn test_short_frame_dropped() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(&frame(b"360046D8")).count(), 0);
    }

    #[test]
    fn test_overflow_resyncs() {
        let mut parser = FrameParser::new();
        for &b in b"\x02360046D804" {
            assert!(parser.push(b).is_none());
        }
        assert_eq!(parser.state(), ParserState::ReadPayload);
        assert!(parser.push(b'A').is_none());
        assert_eq!(parser.state(), ParserState::WaitStart);
        assert!(parser.push(END_MARKER).is_none());
    }

    #[test]
    fn test_second_start_restarts_payload() {
        let mut parser = FrameParser::new();
        let uid = parser.feed(b"\x0212345\x02AABBCCDDEE\x03").next();
        assert_eq!(uid.map(|u| u.as_str() == "AABBCCDDEE"), Some(true));
    }

    #[test]
    fn test_garbage_before_start_ignored() {
        let mut parser = FrameParser::new();
        let uid = parser.feed(b"xyz\x03\x0aAABBCCDDEE\x02AABBCCDDEE\x03").next();
        assert!(uid.is_some());
    }
}

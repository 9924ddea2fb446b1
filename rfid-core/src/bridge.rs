//! Transparente Byte-Bridge (Turbo-Modus auf Gerät A)
//!
//! Die Main-Loop ruft `pump()` zyklisch auf. Pro Aufruf werden höchstens
//! `budget` Bytes kopiert, damit die Loop nie länger hängt als nötig.

use crate::traits::{ByteSink, ByteSource, LinkError};

/// Kopiert verfügbare Bytes von `src` nach `dst`
///
/// Gibt die Anzahl weitergeleiteter Bytes zurück. Bei einem Schreibfehler
/// wird abgebrochen; das betroffene Byte ist verloren (der Frame-Parser auf
/// der Gegenseite resynchronisiert sich).
pub fn pump<S: ByteSource, D: ByteSink>(
    src: &mut S,
    dst: &mut D,
    budget: usize,
) -> Result<usize, LinkError> {
    let mut forwarded = 0;
    while forwarded < budget {
        let Some(byte) = src.poll_byte() else {
            break;
        };
        dst.write_byte(byte)?;
        forwarded += 1;
    }
    Ok(forwarded)
}

/// Leert eine Quelle ohne weiterzuleiten (Bridge deaktiviert)
pub fn drain<S: ByteSource>(src: &mut S, budget: usize) -> usize {
    let mut dropped = 0;
    while dropped < budget && src.poll_byte().is_some() {
        dropped += 1;
    }
    dropped
}

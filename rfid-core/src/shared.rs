//! Zwischen Interrupt und Main-Loop geteilte Werte
//!
//! Jeder Zugriff läuft in einer `critical_section`, d.h. mit kurz
//! maskierten Interrupts. Dadurch sieht weder die Main-Loop noch ein
//! anderer Interrupt jemals einen halb geschriebenen Wert.
//!
//! Beide Typen sind `const`-konstruierbar und damit als `static` nutzbar.

use core::cell::Cell;

use critical_section::Mutex;

/// Geschützte Zelle mit atomarem get/set
pub struct Shared<T: Copy> {
    inner: Mutex<Cell<T>>,
}

impl<T: Copy> Shared<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Cell::new(value)),
        }
    }

    pub fn get(&self) -> T {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    pub fn set(&self, value: T) {
        critical_section::with(|cs| self.inner.borrow(cs).set(value));
    }

    /// Setzt einen neuen Wert und liefert den alten
    pub fn replace(&self, value: T) -> T {
        critical_section::with(|cs| self.inner.borrow(cs).replace(value))
    }

    /// Read-modify-write ohne Unterbrechung dazwischen
    pub fn update(&self, f: impl FnOnce(T) -> T) -> T {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let next = f(cell.get());
            cell.set(next);
            next
        })
    }

    /// Zugriff auf die rohe Zelle innerhalb einer bereits offenen Critical Section
    ///
    /// Für Updates, die mehrere `Shared` gemeinsam konsistent ändern müssen.
    pub fn cell<'cs>(&'cs self, cs: critical_section::CriticalSection<'cs>) -> &'cs Cell<T> {
        self.inner.borrow(cs)
    }
}

/// Einzelner Slot: ISR legt einen Wert ab, Main-Loop holt ihn genau einmal ab
///
/// Ein zweites `post()` vor dem Abholen überschreibt den ersten Wert
/// (latest wins).
pub struct Mailbox<T: Copy> {
    slot: Shared<Option<T>>,
}

impl<T: Copy> Mailbox<T> {
    pub const fn new() -> Self {
        Self {
            slot: Shared::new(None),
        }
    }

    pub fn post(&self, value: T) {
        self.slot.set(Some(value));
    }

    pub fn take(&self) -> Option<T> {
        self.slot.replace(None)
    }

    pub fn is_pending(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<T: Copy> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_get_set() {
        let shared = Shared::new(3u8);
        assert_eq!(shared.get(), 3);
        shared.set(7);
        assert_eq!(shared.get(), 7);
        assert_eq!(shared.replace(9), 7);
        assert_eq!(shared.update(|v| v + 1), 10);
    }

    #[test]
    fn test_mailbox_take_once() {
        let mailbox = Mailbox::new();
        mailbox.post(true);
        assert!(mailbox.is_pending());
        assert_eq!(mailbox.take(), Some(true));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_mailbox_latest_wins() {
        let mailbox = Mailbox::new();
        mailbox.post(1u8);
        mailbox.post(2u8);
        assert_eq!(mailbox.take(), Some(2));
    }
}

//! Mode-Switch: Idle ↔ Turbo
//!
//! Zweigeteilt wie im Rest der Firmware:
//! - **ISR-Seite:** `post_edge()` merkt sich nur den aktuellen Pegel des
//!   Tasters im Mailbox-Slot. Kein Peripherie-Zugriff, konstante Laufzeit.
//! - **Main-Loop-Seite:** `dispatch()` holt das Event genau einmal ab und
//!   schaltet Lichtsensor, Tick-Quelle und Bridge gemeinsam um.
//!
//! Da der *Pegel* und nicht die Flanken-Richtung gelatcht wird, konvergieren
//! mehrere schnelle Flanken immer auf den tatsächlichen Tasterzustand.

use crate::shared::{Mailbox, Shared};
use crate::tempo::TempoControl;
use crate::traits::ModePeripherals;
use crate::types::ModeState;

pub struct ModeSwitch {
    pending: Mailbox<ModeState>,
    current: Shared<ModeState>,
}

impl ModeSwitch {
    pub const fn new() -> Self {
        Self {
            pending: Mailbox::new(),
            current: Shared::new(ModeState::Idle),
        }
    }

    /// Aus dem GPIO-Interrupt (beliebige Flanke)
    ///
    /// `held` ist der aktuelle Pegel nach der Flanke (Taster gedrückt).
    pub fn post_edge(&self, held: bool) {
        self.pending.post(ModeState::from_held(held));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn current(&self) -> ModeState {
        self.current.get()
    }

    /// Aus der Main-Loop: wendet einen anstehenden Wechsel an
    ///
    /// Gibt den neuen Modus zurück, falls sich tatsächlich etwas geändert hat.
    pub fn dispatch<P: ModePeripherals>(
        &self,
        tempo: &TempoControl,
        peripherals: &mut P,
    ) -> Option<ModeState> {
        let target = self.pending.take()?;
        if target == self.current.get() {
            return None;
        }

        match target {
            ModeState::Turbo => {
                tempo.apply_mode(ModeState::Turbo);
                peripherals.set_light_sampling(false);
                peripherals.set_bridge(true);
            }
            ModeState::Idle => {
                peripherals.set_bridge(false);
                tempo.apply_mode(ModeState::Idle);
                peripherals.set_light_sampling(true);
            }
        }

        self.current.set(target);
        Some(target)
    }
}

impl Default for ModeSwitch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TickInterval;

    #[derive(Default)]
    struct Flags {
        sampling: Option<bool>,
        bridge: Option<bool>,
    }

    impl ModePeripherals for Flags {
        fn set_light_sampling(&mut self, enabled: bool) {
            self.sampling = Some(enabled);
        }

        fn set_bridge(&mut self, enabled: bool) {
            self.bridge = Some(enabled);
        }
    }

    #[test]
    fn test_dispatch_without_edge_is_noop() {
        let switch = ModeSwitch::new();
        let tempo = TempoControl::new(100);
        let mut flags = Flags::default();

        assert_eq!(switch.dispatch(&tempo, &mut flags), None);
        assert_eq!(flags.bridge, None);
    }

    #[test]
    fn test_press_enters_turbo() {
        let switch = ModeSwitch::new();
        let tempo = TempoControl::new(100);
        let mut flags = Flags::default();

        switch.post_edge(true);
        assert_eq!(switch.dispatch(&tempo, &mut flags), Some(ModeState::Turbo));
        assert_eq!(flags.sampling, Some(false));
        assert_eq!(flags.bridge, Some(true));
        assert_eq!(tempo.interval(), TickInterval::Turbo);

        // Flag wurde verbraucht
        assert_eq!(switch.dispatch(&tempo, &mut flags), None);
    }

    #[test]
    fn test_bouncing_edges_converge_to_level() {
        let switch = ModeSwitch::new();
        let tempo = TempoControl::new(100);
        let mut flags = Flags::default();

        switch.post_edge(true);
        switch.post_edge(false);
        switch.post_edge(true);
        switch.post_edge(false);

        // Endpegel ist "losgelassen" → kein Wechsel
        assert_eq!(switch.dispatch(&tempo, &mut flags), None);
        assert_eq!(switch.current(), ModeState::Idle);
    }
}

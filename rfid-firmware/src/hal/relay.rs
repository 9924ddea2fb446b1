// GPIO-Ausgang für das Relay-Modul

use esp_hal::gpio::{Level, Output};
use rfid_core::RelayOutput;

/// Relay an einem GPIO, optional active-low verdrahtet
pub struct GpioRelay<'d> {
    pin: Output<'d>,
    active_low: bool,
}

impl<'d> GpioRelay<'d> {
    /// Übernimmt den Pin und schaltet das Relay sofort ab
    pub fn new(mut pin: Output<'d>, active_low: bool) -> Self {
        pin.set_level(Self::level(false, active_low));
        Self { pin, active_low }
    }

    fn level(energized: bool, active_low: bool) -> Level {
        if energized != active_low {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl RelayOutput for GpioRelay<'_> {
    fn set_energized(&mut self, energized: bool) {
        self.pin.set_level(Self::level(energized, self.active_low));
    }
}

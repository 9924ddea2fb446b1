// LEDC PWM-Ausgang für die Breathing-LED
//
// Der LEDC-Timer läuft mit 8 Bit Auflösung, der Duty-Cycle der Engine
// (0..=255) wird deshalb ohne Umrechnung als Roh-Wert geschrieben.

use esp_hal::ledc::LowSpeed;
use esp_hal::ledc::channel::{Channel, ChannelHW};
use rfid_core::{PwmError, PwmOutput};

/// PWM-Ausgang über einen LEDC Low-Speed Kanal
pub struct LedcPwm<'d> {
    channel: Channel<'d, LowSpeed>,
}

impl<'d> LedcPwm<'d> {
    /// Übernimmt einen bereits konfigurierten Kanal
    pub fn new(channel: Channel<'d, LowSpeed>) -> Self {
        Self { channel }
    }
}

impl PwmOutput for LedcPwm<'_> {
    fn set_duty(&mut self, duty: u8) -> Result<(), PwmError> {
        // Schreibt nur das Duty-Register, kann auf dieser Hardware nicht fehlschlagen
        self.channel.set_duty_hw(duty as u32);
        Ok(())
    }
}

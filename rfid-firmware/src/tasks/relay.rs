// Relay Task - Führt Kommandos vom HTTP Server am GPIO aus
use defmt::info;
use embassy_time::{Duration, Timer};
use rfid_core::{RelayCommand, RelayOutput};

use crate::RelayCommandReceiver;
use crate::config::RELAY_ACTIVE_LOW;
use crate::hal::GpioRelay;

/// Führt ein Kommando Schritt für Schritt aus
pub async fn run_command<O: RelayOutput>(output: &mut O, command: RelayCommand) {
    for step in command.steps() {
        output.set_energized(step.energized);
        if step.hold_ms > 0 {
            Timer::after(Duration::from_millis(step.hold_ms)).await;
        }
    }
}

/// Relay Logic - Testbare Business Logic ohne Hardware-Abhängigkeit
///
/// Kommandos werden strikt nacheinander ausgeführt, ein `Open` während
/// eines laufenden Pulses wartet bis zum Ende des Pulses.
pub async fn relay_logic<O: RelayOutput>(mut output: O, command_receiver: RelayCommandReceiver) {
    output.set_energized(false);

    loop {
        let command = command_receiver.receive().await;
        info!("Relay: Executing {}", command);
        run_command(&mut output, command).await;
    }
}

/// Relay Task - Embassy Task für das Relay-Gerät
#[embassy_executor::task]
pub async fn relay_task(
    pin: esp_hal::gpio::Output<'static>,
    command_receiver: RelayCommandReceiver,
) {
    let relay = GpioRelay::new(pin, RELAY_ACTIVE_LOW);
    relay_logic(relay, command_receiver).await;
}

// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus rfid_core für die ESP32-C6 Peripherie,
// die Logik selbst bleibt hardwareunabhängig und auf dem Host testbar.

pub mod pwm;
pub mod relay;
pub mod serial;

pub use pwm::LedcPwm;
pub use relay::GpioRelay;
pub use serial::{AsyncLink, UartSink, UartSource};

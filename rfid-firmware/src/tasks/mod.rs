// Task-Modul: Embassy Tasks für Gerät B und das Relay-Gerät
//
// Gerät A (Breathing-LED) läuft ohne Executor, seine Interrupt-Handler
// liegen direkt im `breather` Binary.

pub mod client;
pub mod gateway;
pub mod http;
pub mod relay;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use client::{HttpAuthority, HttpRelay};
pub use gateway::gateway_task;
pub use http::http_server_task;
pub use relay::relay_task;
pub use wifi::{WifiLink, connection_task, dhcp_task, net_task};

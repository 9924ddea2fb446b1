// WiFi - Dauerverbindung (Relay-Gerät) und lazy Verbindung (Gerät B)
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer, with_timeout};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};
use rfid_core::{Connectivity, NetError};

use crate::config::{WIFI_CONNECT_TIMEOUT_SECS, WIFI_PASSWORD, WIFI_RETRY_DELAY_SECS, WIFI_SSID};

/// Station-Konfiguration aus den eingebackenen Credentials
fn client_config() -> ModeConfig {
    ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(WIFI_SSID.into())
            .with_password(WIFI_PASSWORD.into()),
    )
}

/// Konfiguriert und startet den Controller, falls er noch nicht läuft
async fn start_if_stopped(controller: &mut WifiController<'static>) -> Result<(), NetError> {
    if matches!(controller.is_started(), Ok(true)) {
        return Ok(());
    }

    info!("WiFi: Configuring and starting...");
    controller.set_config(&client_config()).map_err(|e| {
        error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
        NetError::NotConnected
    })?;
    controller.start_async().await.map_err(|e| {
        error!("WiFi: Failed to start: {}", Debug2Format(&e));
        NetError::NotConnected
    })?;
    info!("WiFi: Started successfully");
    Ok(())
}

// ============================================================================
// Relay-Gerät: Verbindung dauerhaft halten (HTTP Server muss erreichbar sein)
// ============================================================================

/// WiFi Connection Task
///
/// - Verbindet mit Access Point
/// - Wartet auf Disconnect und verbindet neu
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");

    loop {
        if start_if_stopped(&mut controller).await.is_err() {
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
            continue;
        }

        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        if let Err(e) = controller.connect_async().await {
            error!("WiFi: Connection failed: {}", Debug2Format(&e));
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
            continue;
        }
        info!("WiFi: Connected successfully!");

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected from AP, will retry...");

        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Network Task
///
/// Prozessiert Netzwerk-Pakete des embassy-net Stacks.
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task
///
/// Wartet auf die IP-Adresse und loggt die Netzwerk-Konfiguration.
#[embassy_executor::task]
pub async fn dhcp_task(stack: Stack<'static>) {
    stack.wait_config_up().await;

    if let Some(config) = stack.config_v4() {
        info!("WiFi: Got IP address!");
        info!("  IP:      {}", Debug2Format(&config.address.address()));
        info!("  Gateway: {}", Debug2Format(&config.gateway));
        info!("  DNS:     {}", Debug2Format(&config.dns_servers));
    }
}

// ============================================================================
// Gerät B: Verbindung erst beim ersten Frame, danach nur bei Bedarf
// ============================================================================

/// Lazy WiFi-Verbindung für das Gateway
///
/// `ensure_connected` ist idempotent: steht Link und IP, passiert nichts.
/// Sonst wird einmal (mit Timeout) verbunden, ohne Retry-Schleife.
pub struct WifiLink {
    controller: WifiController<'static>,
    stack: Stack<'static>,
}

impl WifiLink {
    pub fn new(controller: WifiController<'static>, stack: Stack<'static>) -> Self {
        Self { controller, stack }
    }

    fn is_up(&self) -> bool {
        matches!(self.controller.is_connected(), Ok(true)) && self.stack.config_v4().is_some()
    }

    async fn connect(&mut self) -> Result<(), NetError> {
        start_if_stopped(&mut self.controller).await?;

        if !matches!(self.controller.is_connected(), Ok(true)) {
            info!("WiFi: Connecting to '{}'...", WIFI_SSID);
            self.controller.connect_async().await.map_err(|e| {
                warn!("WiFi: Connection failed: {}", Debug2Format(&e));
                NetError::NotConnected
            })?;
        }

        self.stack.wait_config_up().await;
        info!("WiFi: Connected, IP configured");
        Ok(())
    }
}

impl Connectivity for WifiLink {
    async fn ensure_connected(&mut self) -> Result<(), NetError> {
        if self.is_up() {
            return Ok(());
        }

        match with_timeout(Duration::from_secs(WIFI_CONNECT_TIMEOUT_SECS), self.connect()).await {
            Ok(result) => result,
            Err(_) => {
                warn!("WiFi: Connect timed out after {}s", WIFI_CONNECT_TIMEOUT_SECS);
                Err(NetError::Timeout)
            }
        }
    }
}

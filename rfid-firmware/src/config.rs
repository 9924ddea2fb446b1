// Projekt-Konfiguration: Pins, Baudraten, Buffer-Größen und Timeouts
//
// Protokoll-Konstanten (Marker, Debounce-Fenster, Duty-Bereich) liegen in
// rfid_core::config und gelten für Host und Target gleichermaßen.
#![allow(dead_code)]

// ============================================================================
// Gerät A: Breathing-LED
// ============================================================================

/// GPIO-Pin für die Breathing-LED (LEDC PWM)
pub const LED_GPIO_PIN: u8 = 8;

/// GPIO-Pin für den Mode-Taster (active low, interner Pull-up)
pub const BUTTON_GPIO_PIN: u8 = 9;

/// GPIO-Pin für den Lichtsensor (ADC1)
pub const LIGHT_SENSOR_GPIO_PIN: u8 = 2;

/// PWM-Frequenz in kHz
/// 5 kHz bei 8 Bit Auflösung: kein sichtbares Flackern
pub const PWM_FREQUENCY_KHZ: u32 = 5;

/// Maximale Anzahl Bytes pro Main-Loop-Durchlauf in der Byte-Bridge
pub const BRIDGE_BUDGET: usize = 32;

// ============================================================================
// Serielle Schnittstellen
// ============================================================================

/// Baudrate des RDM6300 Readers
pub const READER_BAUD: u32 = 9600;

/// Baudrate des Links zwischen Gerät A und Gerät B
pub const LINK_BAUD: u32 = 9600;

/// Gerät A: RX-Pin vom Reader
pub const READER_RX_GPIO_PIN: u8 = 4;

/// Link: RX-Pin (Ergebnis-Bytes bzw. Frames von der Gegenseite)
pub const LINK_RX_GPIO_PIN: u8 = 6;

/// Link: TX-Pin
pub const LINK_TX_GPIO_PIN: u8 = 7;

/// Lese-Buffer für den Frame-Parser (Gerät B)
pub const UART_READ_BUFFER_SIZE: usize = 32;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

/// Timeout für einen Verbindungsaufbau (Gerät B, lazy connect)
pub const WIFI_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Wartezeit nach Verbindungsfehler (Relay-Gerät, Dauerverbindung)
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

// ============================================================================
// Backend + Relay Endpoints (Gerät B)
// ============================================================================

/// Prüf-Endpunkt des Backends, z.B. `http://192.168.1.10:8000/api/scan`
pub const API_URL: &str = env!(
    "API_URL",
    "API URL nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Hostname oder IP-Adresse des Relay-Geräts
pub const RELAY_HOST: &str = env!(
    "RELAY_HOST",
    "Relay Host nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Pfad auf dem Relay-Gerät, der bei Accept aufgerufen wird
pub const RELAY_PATH: &str = match option_env!("RELAY_PATH") {
    Some(path) => path,
    None => "/relay_open",
};

/// Relay-Port (HTTP Standard)
pub const RELAY_PORT: u16 = 80;

/// Timeout für Request + Antwort an das Backend
pub const HTTP_TIMEOUT_SECS: u64 = 5;

/// Timeout für den Relay-Aufruf (best effort)
pub const RELAY_TIMEOUT_SECS: u64 = 2;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 5;

/// Buffer für den kompletten HTTP-Request (Header + JSON-Body)
pub const HTTP_REQUEST_BUFFER_SIZE: usize = 384;

/// Buffer für den JSON-Body `{"uid":"..."}`
pub const JSON_BODY_BUFFER_SIZE: usize = 32;

/// Lese-Chunk für die HTTP-Antwort
pub const HTTP_READ_CHUNK_SIZE: usize = 128;

// ============================================================================
// HTTP Server Konfiguration (Relay-Gerät)
// ============================================================================

/// GPIO-Pin für das Relay
pub const RELAY_GPIO_PIN: u8 = 10;

/// Relay-Modul schaltet bei LOW
pub const RELAY_ACTIVE_LOW: bool = true;

/// HTTP Buffer-Größe in Bytes
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// Anzahl paralleler HTTP-Server Tasks
pub const HTTP_SERVER_TASKS: usize = 2;

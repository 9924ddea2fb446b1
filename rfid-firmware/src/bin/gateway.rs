// Gerät B: UID-Frames vom Link parsen, gegen das Backend prüfen,
// Ergebnis-Byte zurücksenden, bei Accept das Relay auslösen.
#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

extern crate alloc;

use defmt::info;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_time::{Duration, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, Uart};
use static_cell::StaticCell;

use {esp_backtrace as _, esp_println as _};

use rfid_access::config::{
    API_URL, EXTRA_HEAP_SIZE, LINK_BAUD, RELAY_HOST, RELAY_PATH, RELAY_PORT, WIFI_HEAP_SIZE,
};
use rfid_access::hal::AsyncLink;
use rfid_access::tasks::{HttpAuthority, HttpRelay, WifiLink, gateway_task, net_task};
use rfid_core::http::Endpoint;

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Endpoint einmal beim Start zerlegen, ungültige Konfiguration stoppt den Start
    let endpoint = Endpoint::parse(API_URL).expect("API_URL must look like http://host[:port]/path");
    info!(
        "Gateway: Backend {}:{}{}",
        endpoint.host, endpoint.port, endpoint.path
    );

    // Link zu Gerät A (RX: Frames, TX: Ergebnis-Bytes)
    let uart = Uart::new(
        peripherals.UART1,
        UartConfig::default().with_baudrate(LINK_BAUD),
    )
    .expect("Failed to initialize link UART")
    .with_rx(peripherals.GPIO6)
    .with_tx(peripherals.GPIO7)
    .into_async();
    let (rx, tx) = uart.split();

    // WiFi Hardware initialisieren (verbunden wird erst beim ersten Frame)
    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // DHCP + DNS + eine TCP-Verbindung (Backend und Relay nacheinander)
    static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );

    spawner.spawn(net_task(runner)).unwrap();
    spawner
        .spawn(gateway_task(
            rx,
            AsyncLink::new(tx),
            WifiLink::new(wifi_controller, stack),
            HttpAuthority::new(stack, endpoint),
            HttpRelay::new(stack, RELAY_HOST, RELAY_PORT, RELAY_PATH),
        ))
        .unwrap();

    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

// Relay-Gerät: HTTP Server schaltet ein Relay an einem GPIO
#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

extern crate alloc;

use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_time::{Duration, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

use {esp_backtrace as _, esp_println as _};

use rfid_access::RelayCommandChannel;
use rfid_access::config::{EXTRA_HEAP_SIZE, HTTP_SERVER_TASKS, RELAY_ACTIVE_LOW, WIFI_HEAP_SIZE};
use rfid_access::tasks::{connection_task, dhcp_task, http_server_task, net_task, relay_task};

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

    // Relay-Pin sofort in den Ruhezustand, noch vor WiFi
    let idle_level = if RELAY_ACTIVE_LOW {
        Level::High
    } else {
        Level::Low
    };
    let relay_pin = Output::new(peripherals.GPIO10, idle_level, OutputConfig::default());

    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Ein Socket pro HTTP Server Task + DHCP + DNS
    static RESOURCES: StaticCell<StackResources<{ HTTP_SERVER_TASKS + 2 }>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );

    static COMMAND_CHANNEL: StaticCell<RelayCommandChannel> = StaticCell::new();
    let command_channel = COMMAND_CHANNEL.init(RelayCommandChannel::new());

    spawner
        .spawn(relay_task(relay_pin, command_channel.receiver()))
        .unwrap();

    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    for task_id in 0..HTTP_SERVER_TASKS {
        spawner
            .spawn(http_server_task(task_id, stack, command_channel.sender()))
            .unwrap();
    }

    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

// Gerät A: Breathing-LED mit lichtabhängigem Tempo.
// Taster gehalten → Turbo: schnelles Atmen, Reader-Bytes gehen transparent
// an Gerät B. Ergebnis-Bytes von Gerät B werden geloggt.
//
// Läuft ohne Executor: der Tick und der Taster sind Interrupts,
// alles andere passiert in der Main-Loop.
#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use core::cell::RefCell;

use critical_section::Mutex;
use defmt::{debug, info, warn};
use esp_hal::analog::adc::{Adc, AdcConfig, Attenuation};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{DriveMode, Event, Input, InputConfig, Io, Pull};
use esp_hal::handler;
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::time::{Duration, Rate};
use esp_hal::timer::PeriodicTimer;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, Uart};
use esp_hal::{Blocking, main};
use static_cell::StaticCell;

use {esp_backtrace as _, esp_println as _};

// Globaler Allocator (die Library linkt alloc), Gerät A selbst allokiert nie
use esp_alloc as _;

use rfid_access::config::{BRIDGE_BUDGET, LINK_BAUD, PWM_FREQUENCY_KHZ, READER_BAUD};
use rfid_access::hal::{LedcPwm, UartSink, UartSource};
use rfid_core::config::LIGHT_THRESHOLD;
use rfid_core::{
    BreathingConfig, BreathingEngine, ByteSource, ModePeripherals, ModeSwitch, TempoControl,
    TickInterval, Verdict, bridge,
};

esp_bootloader_esp_idf::esp_app_desc!();

// ============================================================================
// Zwischen Interrupts und Main-Loop geteilter Zustand
// ============================================================================

static TEMPO: TempoControl = TempoControl::new(LIGHT_THRESHOLD);
static MODE: ModeSwitch = ModeSwitch::new();

/// Alles, was der Tick-Interrupt anfasst
struct Breather {
    engine: BreathingEngine,
    pwm: LedcPwm<'static>,
    timer: PeriodicTimer<'static, Blocking>,
    /// Aktuell im Timer programmiertes Intervall
    active: TickInterval,
}

static BREATHER: Mutex<RefCell<Option<Breather>>> = Mutex::new(RefCell::new(None));
static BUTTON: Mutex<RefCell<Option<Input<'static>>>> = Mutex::new(RefCell::new(None));

fn period(interval: TickInterval) -> Duration {
    Duration::from_millis(interval.as_millis() as u64)
}

/// Tick: nächster Duty-Cycle, bei Tempo-Wechsel Timer neu programmieren
#[handler]
fn tick_isr() {
    critical_section::with(|cs| {
        let mut guard = BREATHER.borrow_ref_mut(cs);
        let Some(breather) = guard.as_mut() else {
            return;
        };
        breather.timer.clear_interrupt();

        if breather.engine.drive(&mut breather.pwm).is_err() {
            warn!("Breather: PWM write failed");
        }

        let wanted = TEMPO.interval();
        if wanted != breather.active && breather.timer.start(period(wanted)).is_ok() {
            breather.active = wanted;
        }
    });
}

/// Taster (active low): jede Flanke meldet den aktuellen Pegel
#[handler]
fn button_isr() {
    critical_section::with(|cs| {
        let mut guard = BUTTON.borrow_ref_mut(cs);
        let Some(button) = guard.as_mut() else {
            return;
        };
        if button.is_interrupt_set() {
            MODE.post_edge(button.is_low());
            button.clear_interrupt();
        }
    });
}

// ============================================================================
// Main-Loop Peripherie
// ============================================================================

/// Schalter für die Main-Loop-Aufgaben, die vom Modus abhängen
struct LoopGates {
    light_sampling: bool,
    bridge: bool,
}

impl ModePeripherals for LoopGates {
    fn set_light_sampling(&mut self, enabled: bool) {
        self.light_sampling = enabled;
    }

    fn set_bridge(&mut self, enabled: bool) {
        self.bridge = enabled;
    }
}

#[main]
fn main() -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("Breather: Starting");

    // PWM: LEDC Low-Speed, 8 Bit, Timer muss 'static leben (Kanal referenziert ihn)
    let mut ledc = Ledc::new(peripherals.LEDC);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    let mut lstimer = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    lstimer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty8Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_khz(PWM_FREQUENCY_KHZ),
        })
        .expect("Failed to configure LEDC timer");
    static LEDC_TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();
    let lstimer = LEDC_TIMER.init(lstimer);

    let mut led_channel = ledc.channel::<LowSpeed>(channel::Number::Channel0, peripherals.GPIO8);
    led_channel
        .configure(channel::config::Config {
            timer: &*lstimer,
            duty_pct: 0,
            drive_mode: DriveMode::PushPull,
        })
        .expect("Failed to configure LEDC channel");

    // Lichtsensor am ADC1, Oneshot-Wandlung wird in der Main-Loop gepollt
    let mut adc_config = AdcConfig::new();
    let mut light_pin = adc_config.enable_pin(peripherals.GPIO2, Attenuation::_11dB);
    let mut adc = Adc::new(peripherals.ADC1, adc_config);

    // Reader (nur RX) und Link zu Gerät B
    let reader = Uart::new(
        peripherals.UART0,
        UartConfig::default().with_baudrate(READER_BAUD),
    )
    .expect("Failed to initialize reader UART")
    .with_rx(peripherals.GPIO4);
    let (reader_rx, _) = reader.split();
    let mut reader = UartSource::new(reader_rx);

    let link = Uart::new(
        peripherals.UART1,
        UartConfig::default().with_baudrate(LINK_BAUD),
    )
    .expect("Failed to initialize link UART")
    .with_rx(peripherals.GPIO6)
    .with_tx(peripherals.GPIO7);
    let (link_rx, link_tx) = link.split();
    let mut link_rx = UartSource::new(link_rx);
    let mut link_tx = UartSink::new(link_tx);

    // Tick-Timer
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let mut tick_timer = PeriodicTimer::new(timg0.timer0);
    tick_timer.set_interrupt_handler(tick_isr);

    let start_interval = TEMPO.interval();
    critical_section::with(|cs| {
        tick_timer.listen();
        tick_timer
            .start(period(start_interval))
            .expect("Failed to start tick timer");
        BREATHER.borrow_ref_mut(cs).replace(Breather {
            engine: BreathingEngine::new(BreathingConfig::DEFAULT),
            pwm: LedcPwm::new(led_channel),
            timer: tick_timer,
            active: start_interval,
        });
    });

    // Taster
    let mut io = Io::new(peripherals.IO_MUX);
    io.set_interrupt_handler(button_isr);
    let mut button = Input::new(
        peripherals.GPIO9,
        InputConfig::default().with_pull(Pull::Up),
    );

    // Schon beim Start gehaltener Taster zählt wie eine Flanke
    MODE.post_edge(button.is_low());
    critical_section::with(|cs| {
        button.listen(Event::AnyEdge);
        BUTTON.borrow_ref_mut(cs).replace(button);
    });

    let mut gates = LoopGates {
        light_sampling: true,
        bridge: false,
    };

    info!("Breather: Running ({})", MODE.current());

    loop {
        if let Some(mode) = MODE.dispatch(&TEMPO, &mut gates) {
            info!("Breather: Mode → {} (tick {})", mode, TEMPO.interval());
        }

        if gates.light_sampling {
            match adc.read_oneshot(&mut light_pin) {
                Ok(sample) => {
                    TEMPO.on_light_sample(sample);
                }
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(_)) => debug!("Breather: ADC read failed"),
            }
        }

        // Reader-Bytes: im Turbo weiterleiten, sonst verwerfen
        if gates.bridge {
            if let Err(e) = bridge::pump(&mut reader, &mut link_tx, BRIDGE_BUDGET) {
                warn!("Breather: Bridge write failed: {}", e);
            }
        } else {
            bridge::drain(&mut reader, BRIDGE_BUDGET);
        }

        // Ergebnis-Bytes von Gerät B
        while let Some(byte) = link_rx.poll_byte() {
            match Verdict::try_from(byte) {
                Ok(verdict) => info!("Breather: Gateway verdict {}", verdict),
                Err(other) => debug!("Breather: Ignoring byte {=u8:#x} from gateway", other),
            }
        }
    }
}

//! Tempo-Steuerung: Lichtsensor → Tick-Intervall
//!
//! Das aktive Tick-Intervall wird von drei Seiten angefasst:
//! - ADC (neuer Lichtwert, nur im Idle-Modus)
//! - Main-Loop (Moduswechsel, erzwingt Turbo bzw. stellt den Lichtwert wieder her)
//! - Timer-Interrupt (liest das Intervall für die nächste Periode)
//!
//! Alle zusammengehörigen Felder werden in *einer* Critical Section
//! gelesen und geschrieben.

use crate::config::LIGHT_THRESHOLD;
use crate::shared::Shared;
use crate::types::{ModeState, TickInterval};

/// Intervall für einen Lichtwert: hell → schnell, sonst langsam
pub fn select_interval(sample: u16, threshold: u16) -> TickInterval {
    if sample > threshold {
        TickInterval::Fast
    } else {
        TickInterval::Slow
    }
}

/// Geteilter Tempo-Zustand von Gerät A
pub struct TempoControl {
    threshold: u16,
    mode: Shared<ModeState>,
    interval: Shared<TickInterval>,
    /// Letzte Auswahl des Lichtsensors, für die Rückkehr nach Idle
    sampled: Shared<TickInterval>,
}

impl TempoControl {
    pub const fn new(threshold: u16) -> Self {
        Self {
            threshold,
            mode: Shared::new(ModeState::Idle),
            interval: Shared::new(TickInterval::Slow),
            sampled: Shared::new(TickInterval::Slow),
        }
    }

    /// Neuer Lichtwert vom ADC
    ///
    /// Gibt `false` zurück, wenn der Wert im Turbo-Modus verworfen wurde.
    pub fn on_light_sample(&self, sample: u16) -> bool {
        let selected = select_interval(sample, self.threshold);
        critical_section::with(|cs| {
            if self.mode.cell(cs).get() != ModeState::Idle {
                return false;
            }
            self.sampled.cell(cs).set(selected);
            self.interval.cell(cs).set(selected);
            true
        })
    }

    /// Vom Mode-Dispatcher in der Main-Loop aufgerufen
    pub fn apply_mode(&self, mode: ModeState) {
        critical_section::with(|cs| {
            self.mode.cell(cs).set(mode);
            let interval = match mode {
                ModeState::Turbo => TickInterval::Turbo,
                ModeState::Idle => self.sampled.cell(cs).get(),
            };
            self.interval.cell(cs).set(interval);
        });
    }

    pub fn interval(&self) -> TickInterval {
        self.interval.get()
    }

    pub fn mode(&self) -> ModeState {
        self.mode.get()
    }

    pub fn sampling_enabled(&self) -> bool {
        self.mode() == ModeState::Idle
    }

    pub fn last_sampled(&self) -> TickInterval {
        self.sampled.get()
    }
}

impl Default for TempoControl {
    fn default() -> Self {
        Self::new(LIGHT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_interval_threshold_is_exclusive() {
        assert_eq!(select_interval(101, 100), TickInterval::Fast);
        assert_eq!(select_interval(100, 100), TickInterval::Slow);
        assert_eq!(select_interval(0, 100), TickInterval::Slow);
    }

    #[test]
    fn test_turbo_ignores_samples() {
        let tempo = TempoControl::new(100);
        tempo.apply_mode(ModeState::Turbo);

        assert!(!tempo.on_light_sample(4000));
        assert_eq!(tempo.interval(), TickInterval::Turbo);
    }

    #[test]
    fn test_idle_restores_last_sample() {
        let tempo = TempoControl::new(100);
        assert!(tempo.on_light_sample(500));
        tempo.apply_mode(ModeState::Turbo);
        tempo.apply_mode(ModeState::Idle);

        assert_eq!(tempo.interval(), TickInterval::Fast);
    }
}

//! Relay-Kommandos des Relay-Geräts
//!
//! HTTP-Pfade:
//! - `/relay_on`   → Relay an
//! - `/relay_off`  → Relay aus
//! - `/relay_open` → an, `RELAY_PULSE_MS` halten, wieder aus

use crate::config::RELAY_PULSE_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayCommand {
    On,
    Off,
    Open,
}

/// Ein Schritt der Relay-Ansteuerung: Pegel setzen, dann `hold_ms` warten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayStep {
    pub energized: bool,
    pub hold_ms: u64,
}

impl RelayCommand {
    pub fn path(self) -> &'static str {
        match self {
            RelayCommand::On => "/relay_on",
            RelayCommand::Off => "/relay_off",
            RelayCommand::Open => "/relay_open",
        }
    }

    /// Pegelfolge für dieses Kommando
    pub fn steps(self) -> &'static [RelayStep] {
        const ON: [RelayStep; 1] = [RelayStep {
            energized: true,
            hold_ms: 0,
        }];
        const OFF: [RelayStep; 1] = [RelayStep {
            energized: false,
            hold_ms: 0,
        }];
        const OPEN: [RelayStep; 2] = [
            RelayStep {
                energized: true,
                hold_ms: RELAY_PULSE_MS,
            },
            RelayStep {
                energized: false,
                hold_ms: 0,
            },
        ];

        match self {
            RelayCommand::On => &ON,
            RelayCommand::Off => &OFF,
            RelayCommand::Open => &OPEN,
        }
    }
}

impl TryFrom<&str> for RelayCommand {
    type Error = ();

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        match path {
            "/relay_on" => Ok(Self::On),
            "/relay_off" => Ok(Self::Off),
            "/relay_open" => Ok(Self::Open),
            _ => Err(()),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RelayCommand {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for cmd in [RelayCommand::On, RelayCommand::Off, RelayCommand::Open] {
            assert_eq!(RelayCommand::try_from(cmd.path()), Ok(cmd));
        }
        assert!(RelayCommand::try_from("/relay").is_err());
    }

    #[test]
    fn test_open_pulses_then_releases() {
        let steps = RelayCommand::Open.steps();
        assert_eq!(steps.len(), 2);
        assert!(steps[0].energized);
        assert_eq!(steps[0].hold_ms, RELAY_PULSE_MS);
        assert!(!steps[1].energized);
    }
}

//! Breathing-Engine: Dreieck-Rampe des LED Duty-Cycles
//!
//! Pro Timer-Tick wird der Duty-Cycle um `step` in die aktuelle Richtung
//! bewegt. An `min` bzw. `max` wird geklemmt und die Richtung gedreht.
//! Das Tempo kommt ausschließlich vom Tick-Intervall (siehe `tempo`).

use crate::config::{DUTY_MAX, DUTY_MIN, DUTY_STEP};
use crate::traits::{PwmError, PwmOutput};
use crate::types::{Direction, DutyCycle};

/// Grenzen und Schrittweite der Rampe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathingConfig {
    pub min: u8,
    pub max: u8,
    pub step: u8,
}

/// Ungültige Rampen-Konfiguration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `min` muss kleiner als `max` sein
    EmptyRange,
    ZeroStep,
}

impl BreathingConfig {
    pub const DEFAULT: Self = Self {
        min: DUTY_MIN,
        max: DUTY_MAX,
        step: DUTY_STEP,
    };

    pub fn new(min: u8, max: u8, step: u8) -> Result<Self, ConfigError> {
        if min >= max {
            return Err(ConfigError::EmptyRange);
        }
        if step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        Ok(Self { min, max, step })
    }
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Duty-Cycle Oszillator
///
/// Läuft im Timer-Interrupt. Reine Arithmetik, kann nicht fehlschlagen.
#[derive(Debug, Clone)]
pub struct BreathingEngine {
    config: BreathingConfig,
    duty: DutyCycle,
}

impl BreathingEngine {
    /// Startet am unteren Ende, Richtung aufwärts
    pub const fn new(config: BreathingConfig) -> Self {
        Self {
            duty: DutyCycle {
                magnitude: config.min,
                direction: Direction::Up,
            },
            config,
        }
    }

    pub fn config(&self) -> BreathingConfig {
        self.config
    }

    pub fn duty(&self) -> DutyCycle {
        self.duty
    }

    /// Ein Schritt der Rampe
    ///
    /// Die Richtung kippt genau in dem Tick, in dem eine Grenze erreicht wird.
    pub fn tick(&mut self) -> DutyCycle {
        let BreathingConfig { min, max, step } = self.config;
        let current = self.duty.magnitude;

        let direction = self.duty.direction;
        let (magnitude, at_bound) = match direction {
            Direction::Up => {
                let next = current.saturating_add(step).min(max);
                (next, next == max)
            }
            Direction::Down => {
                let next = current.saturating_sub(step).max(min);
                (next, next == min)
            }
        };

        self.duty = DutyCycle {
            magnitude,
            direction: if at_bound { direction.flipped() } else { direction },
        };

        self.duty
    }

    /// Tick ausführen und den neuen Wert sofort auf den PWM-Ausgang schreiben
    pub fn drive<P: PwmOutput>(&mut self, pwm: &mut P) -> Result<DutyCycle, PwmError> {
        let duty = self.tick();
        pwm.set_duty(duty.magnitude)?;
        Ok(duty)
    }
}

impl Default for BreathingEngine {
    fn default() -> Self {
        Self::new(BreathingConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rejects_invalid() {
        assert_eq!(BreathingConfig::new(10, 10, 1), Err(ConfigError::EmptyRange));
        assert_eq!(BreathingConfig::new(0, 10, 0), Err(ConfigError::ZeroStep));
    }

    #[test]
    fn test_tick_exact_divisor_hits_bounds() {
        let config = BreathingConfig::new(0, 10, 5).unwrap();
        let mut engine = BreathingEngine::new(config);

        assert_eq!(engine.tick().magnitude, 5);
        let top = engine.tick();
        assert_eq!(top.magnitude, 10);
        assert_eq!(top.direction, Direction::Down);
        assert_eq!(engine.tick().magnitude, 5);
        let bottom = engine.tick();
        assert_eq!(bottom.magnitude, 0);
        assert_eq!(bottom.direction, Direction::Up);
    }

    #[test]
    fn test_tick_non_divisor_clamps() {
        let config = BreathingConfig::new(0, 10, 4).unwrap();
        let mut engine = BreathingEngine::new(config);

        assert_eq!(engine.tick().magnitude, 4);
        assert_eq!(engine.tick().magnitude, 8);
        let top = engine.tick();
        assert_eq!(top.magnitude, 10); // geklemmt
        assert_eq!(top.direction, Direction::Down);
        assert_eq!(engine.tick().magnitude, 6);
    }

    #[test]
    fn test_tick_saturates_at_u8_max() {
        let mut engine = BreathingEngine::new(BreathingConfig::new(250, 255, 4).unwrap());
        assert_eq!(engine.tick().magnitude, 254);
        assert_eq!(engine.tick().magnitude, 255);
        assert_eq!(engine.duty().direction, Direction::Down);
    }
}

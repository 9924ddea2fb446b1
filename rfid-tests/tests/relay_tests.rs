//! Tests für die Relay-Kommandos gegen einen Mock-Ausgang

use rfid_core::config::RELAY_PULSE_MS;
use rfid_core::{RelayCommand, RelayOutput};
use rfid_tests::MockRelayOutput;

/// Führt die Pegelfolge ohne Wartezeiten aus, gibt die Summe der Haltezeiten zurück
fn apply(output: &mut MockRelayOutput, command: RelayCommand) -> u64 {
    command
        .steps()
        .iter()
        .map(|step| {
            output.set_energized(step.energized);
            step.hold_ms
        })
        .sum()
}

#[test]
fn test_open_pulses_and_releases() {
    let mut relay = MockRelayOutput::default();
    let held = apply(&mut relay, RelayCommand::Open);

    assert_eq!(relay.levels, vec![true, false]);
    assert_eq!(held, RELAY_PULSE_MS);
    assert!(!relay.energized());
}

#[test]
fn test_on_off_are_single_level_changes() {
    let mut relay = MockRelayOutput::default();

    assert_eq!(apply(&mut relay, RelayCommand::On), 0);
    assert!(relay.energized());

    assert_eq!(apply(&mut relay, RelayCommand::Off), 0);
    assert!(!relay.energized());
    assert_eq!(relay.levels, vec![true, false]);
}

#[test]
fn test_paths_route_back_to_commands() {
    for command in [RelayCommand::On, RelayCommand::Off, RelayCommand::Open] {
        assert_eq!(RelayCommand::try_from(command.path()), Ok(command));
    }
    assert_eq!(RelayCommand::try_from("/relay_toggle"), Err(()));
}

use crate::{BindingTable, Command, CoreError, Shortcut};

/// WHAT: Defaults cover every command
/// WHY: A missing config section must still yield a complete table
#[test]
fn given_no_overrides_when_building_table_then_defaults_apply() {
    // Given/When: The default table
    let table = BindingTable::defaults();

    // Then: Each command has its documented shortcut
    let expected = [
        (Command::Exit, "alt+escape"),
        (Command::Previous, "alt+left"),
        (Command::Next, "alt+right"),
        (Command::PlayPause, "alt+space"),
        (Command::VolumeUp, "alt+up"),
        (Command::VolumeDown, "alt+down"),
    ];
    for (command, spec) in expected {
        assert_eq!(table.get(command).as_str(), spec);
    }
    assert_eq!(table.iter().count(), Command::ALL.len());
}

/// WHAT: Overrides replace only the named commands
/// WHY: Users rebind one key without restating the rest
#[test]
#[allow(clippy::unwrap_used)]
fn given_override_when_building_table_then_other_defaults_kept() {
    // Given: A single override with untidy spacing and case
    let overrides = [(Command::PlayPause, "Ctrl + Shift + P")];

    // When: Building the table
    let table = BindingTable::with_overrides(overrides).unwrap();

    // Then: The override is normalized and the rest are defaults
    assert_eq!(table.get(Command::PlayPause).as_str(), "ctrl+shift+p");
    assert_eq!(table.get(Command::Next).as_str(), "alt+right");
}

/// WHAT: Two commands on one shortcut is rejected
/// WHY: Only one command could ever fire for that chord
#[test]
fn given_duplicate_shortcut_when_building_table_then_invalid_binding() {
    // Given: Next rebound onto Previous's default
    let overrides = [(Command::Next, "alt+left")];

    // When: Building the table
    let result = BindingTable::with_overrides(overrides);

    // Then: The later command is reported
    assert!(matches!(
        result,
        Err(CoreError::InvalidBinding {
            command: Command::Next,
            ..
        })
    ));
}

/// WHAT: Empty and dangling-plus shortcuts are rejected
/// WHY: They cannot name a key chord
#[test]
fn given_malformed_spec_when_creating_shortcut_then_error() {
    // Given/When/Then: Each malformed spec fails
    for spec in ["", "   ", "alt+", "+x", "alt++up"] {
        assert!(
            Shortcut::new(Command::Exit, spec).is_err(),
            "{spec:?} should be rejected"
        );
    }
}

/// WHAT: Shortcut segments split on plus
/// WHY: The hotkey parser consumes modifiers and key separately
#[test]
#[allow(clippy::unwrap_used)]
fn given_shortcut_when_splitting_then_segments_in_order() {
    // Given: A three-part shortcut
    let shortcut = Shortcut::new(Command::VolumeUp, "ctrl+alt+up").unwrap();

    // When: Splitting
    let segments: Vec<_> = shortcut.segments().collect();

    // Then: Segments keep their order
    assert_eq!(segments, ["ctrl", "alt", "up"]);
}

/// WHAT: Modifier order and aliases do not change a shortcut's identity
/// WHY: The OS sees `left+alt` and `alt+left` as the same chord
#[test]
#[allow(clippy::unwrap_used)]
fn given_reordered_modifiers_when_normalizing_then_canonical_form() {
    // Given/When: Differently spelled versions of one chord
    let reordered = Shortcut::new(Command::Next, "Left + Alt").unwrap();
    let aliased = Shortcut::new(Command::Next, "option+left").unwrap();
    let mixed = Shortcut::new(Command::Next, "up+shift+ctrl+shift").unwrap();

    // Then: Modifiers come first in a fixed order, aliases collapse
    assert_eq!(reordered.as_str(), "alt+left");
    assert_eq!(aliased, reordered);
    assert_eq!(mixed.as_str(), "ctrl+shift+up");
}

/// WHAT: A reordered copy of another command's chord is rejected
/// WHY: Otherwise the clash only surfaces as an OS registration failure
#[test]
fn given_reordered_duplicate_when_building_table_then_invalid_binding() {
    // Given: Next bound to Previous's default with the modifier last
    let overrides = [(Command::Next, "left+alt")];

    // When: Building the table
    let result = BindingTable::with_overrides(overrides);

    // Then: Rejected as a duplicate
    assert!(matches!(
        result,
        Err(CoreError::InvalidBinding {
            command: Command::Next,
            ..
        })
    ));
}

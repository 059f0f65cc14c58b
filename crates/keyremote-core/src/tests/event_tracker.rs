use crate::{Command, EventTracker};

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

/// WHAT: The slot holds the most recently fired command
/// WHY: Last-write-wins is the mailbox contract for non-exit commands
#[test]
fn given_several_fires_when_peeking_then_last_command_wins() {
    // Given: An empty tracker
    let tracker = EventTracker::new();
    assert_eq!(tracker.peek(), None);

    // When: Firing a sequence of non-exit commands
    for command in [Command::Next, Command::VolumeUp, Command::Previous] {
        tracker.fire(command);
    }

    // Then: Only the last one is pending
    assert_eq!(tracker.peek(), Some(Command::Previous));
}

/// WHAT: clear() empties a pending non-exit command
/// WHY: The control loop must be able to consume what it dispatched
#[test]
fn given_pending_command_when_clearing_then_slot_empty() {
    // Given: A pending PlayPause
    let tracker = EventTracker::new();
    tracker.fire(Command::PlayPause);

    // When: Clearing
    tracker.clear();

    // Then: Nothing is pending
    assert_eq!(tracker.peek(), None);
    assert!(!tracker.exit_requested());
}

/// WHAT: Exit cannot be overwritten by later fires
/// WHY: A stray hotkey after Exit must not cancel shutdown
#[test]
fn given_exit_fired_when_firing_other_commands_then_exit_remains() {
    // Given: Exit has been fired
    let tracker = EventTracker::new();
    tracker.fire(Command::Exit);

    // When: Every other command fires afterwards
    for command in Command::ALL {
        tracker.fire(command);
    }

    // Then: Exit is still pending
    assert_eq!(tracker.peek(), Some(Command::Exit));
}

/// WHAT: clear() and take() leave Exit in place
/// WHY: Only the terminal transition may consume Exit
#[test]
fn given_exit_fired_when_clearing_or_taking_then_exit_remains() {
    // Given: Exit has been fired
    let tracker = EventTracker::new();
    tracker.fire(Command::Exit);

    // When: Clearing and taking
    tracker.clear();
    let taken = tracker.take();

    // Then: take yields nothing and Exit is untouched
    assert_eq!(taken, None);
    assert!(tracker.exit_requested());
}

/// WHAT: take() returns and removes the pending command
/// WHY: The loop consumes commands atomically so a concurrent fire is kept
#[test]
fn given_pending_command_when_taking_then_returned_once() {
    // Given: A pending Next
    let tracker = EventTracker::new();
    tracker.fire(Command::Next);

    // When: Taking twice
    let first = tracker.take();
    let second = tracker.take();

    // Then: Only the first take sees it
    assert_eq!(first, Some(Command::Next));
    assert_eq!(second, None);
}

/// WHAT: The exit hook runs exactly once
/// WHY: Hotkey teardown must happen on the first Exit only
#[test]
fn given_exit_hook_when_exit_fired_twice_then_hook_runs_once() {
    // Given: A tracker counting hook invocations
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let tracker = EventTracker::with_exit_hook(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    // When: Firing a normal command, then Exit twice
    tracker.fire(Command::VolumeDown);
    tracker.fire(Command::Exit);
    tracker.fire(Command::Exit);

    // Then: The hook ran once, for Exit only
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// WHAT: Exit survives concurrent producers
/// WHY: Hotkeys fire from another thread at arbitrary times
#[test]
#[allow(clippy::unwrap_used)]
fn given_concurrent_fires_when_exit_among_them_then_exit_wins() {
    // Given: A shared tracker
    let tracker = Arc::new(EventTracker::new());

    // When: Several threads hammer the slot, one of them firing Exit midway
    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || {
                for i in 0..1_000 {
                    if worker == 0 && i == 500 {
                        tracker.fire(Command::Exit);
                    } else {
                        tracker.fire(Command::ALL[1 + (i % 5)]);
                    }
                    tracker.clear();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    // Then: Exit is what remains
    assert_eq!(tracker.peek(), Some(Command::Exit));
}

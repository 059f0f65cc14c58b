use crate::{
    Command, ControlLayout, ControlLoop, ElementHandle, EventTracker, LoopSettings, LoopState,
    Step,
    tests::scripted_driver::{Call, ScriptedDriver},
};

use std::{sync::Arc, time::Duration};

async fn ready_loop(
    address: &str,
) -> (ControlLoop<ScriptedDriver>, ScriptedDriver, Arc<EventTracker>) {
    let driver = ScriptedDriver::player(address);
    let tracker = Arc::new(EventTracker::new());
    #[allow(clippy::unwrap_used)]
    let mut control = ControlLoop::new(
        driver.clone(),
        Arc::clone(&tracker),
        ControlLayout::default(),
        LoopSettings::default(),
    )
    .await
    .unwrap();
    assert_eq!(control.step().await, Step::Continue);
    (control, driver, tracker)
}

/// WHAT: The first iteration resolves handles and becomes Ready
/// WHY: Commands can only be dispatched once handles are valid
#[tokio::test]
async fn given_player_page_when_first_step_then_ready() {
    // Given/When: A loop stepped once on a player page
    let (control, driver, _tracker) = ready_loop("https://player.test/").await;

    // Then: The loop is Ready and nothing was clicked
    assert_eq!(control.state(), LoopState::Ready);
    assert!(control.is_ready());
    assert!(driver.calls().is_empty());
}

/// WHAT: PlayPause while Ready clicks play/pause exactly once
/// WHY: One fired command must produce one action
#[tokio::test]
async fn given_ready_when_play_pause_fired_then_one_click_and_slot_empty() {
    // Given: A Ready loop
    let (mut control, driver, tracker) = ready_loop("https://player.test/").await;

    // When: PlayPause fires and the loop iterates twice
    tracker.fire(Command::PlayPause);
    control.step().await;
    control.step().await;

    // Then: Exactly one click on the play/pause handle, slot empty
    assert_eq!(driver.calls(), vec![Call::Click("play".to_string())]);
    assert_eq!(tracker.peek(), None);
}

/// WHAT: VolumeUp produces a single positive drag
/// WHY: The action must not repeat until a new command fires
#[tokio::test]
async fn given_ready_when_volume_up_fired_then_single_positive_drag() {
    // Given: A Ready loop
    let (mut control, driver, tracker) = ready_loop("https://player.test/").await;

    // When: VolumeUp fires once and the loop iterates several times
    tracker.fire(Command::VolumeUp);
    for _ in 0..5 {
        control.step().await;
    }

    // Then: One drag right on the volume handle
    assert_eq!(
        driver.calls(),
        vec![Call::DragBy("volume".to_string(), 10, 0)]
    );
}

/// WHAT: Each dispatch table entry reaches the right control
/// WHY: Previous/Next/VolumeDown must not be crossed with other controls
#[tokio::test]
async fn given_ready_when_each_command_fired_then_matching_action() {
    // Given: A Ready loop
    let (mut control, driver, tracker) = ready_loop("https://player.test/").await;

    // When: Firing each command in its own iteration
    for command in [Command::Previous, Command::Next, Command::VolumeDown] {
        tracker.fire(command);
        control.step().await;
    }

    // Then: Actions follow the dispatch table
    assert_eq!(
        driver.calls(),
        vec![
            Call::Click("prev".to_string()),
            Call::Click("next".to_string()),
            Call::DragBy("volume".to_string(), -10, 0),
        ]
    );
}

/// WHAT: Only the latest of several undrained fires is dispatched
/// WHY: The slot holds one command; there is no queue
#[tokio::test]
async fn given_two_fires_before_step_when_stepping_then_only_last_dispatched() {
    // Given: A Ready loop
    let (mut control, driver, tracker) = ready_loop("https://player.test/").await;

    // When: Next then Previous fire before the loop observes either
    tracker.fire(Command::Next);
    tracker.fire(Command::Previous);
    control.step().await;

    // Then: Only Previous was acted on
    assert_eq!(driver.calls(), vec![Call::Click("prev".to_string())]);
}

/// WHAT: Commands fired while controls are missing are discarded
/// WHY: Stale commands must not replay when the player appears
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_controls_missing_when_next_fired_then_discarded_without_error() {
    // Given: A login page without the player
    let driver = ScriptedDriver::player("https://login.test/");
    driver.hide_player();
    let tracker = Arc::new(EventTracker::new());
    let mut control = ControlLoop::new(
        driver.clone(),
        Arc::clone(&tracker),
        ControlLayout::default(),
        LoopSettings::default(),
    )
    .await
    .unwrap();

    // When: Next fires and the loop iterates
    tracker.fire(Command::Next);
    let step = control.step().await;

    // Then: No dispatch, slot cleared, loop continues in Stale
    assert_eq!(step, Step::Continue);
    assert_eq!(control.state(), LoopState::Stale);
    assert!(driver.calls().is_empty());
    assert_eq!(tracker.peek(), None);

    // And: The discarded command is not replayed once the player appears
    driver.show_player();
    driver.navigate("https://player.test/");
    control.step().await;
    assert!(control.is_ready());
    assert!(driver.calls().is_empty());
}

/// WHAT: An address change invalidates readiness until re-resolution succeeds
/// WHY: Handles are only valid for the page they came from
#[tokio::test]
async fn given_ready_when_address_changes_then_readiness_follows_resolution() {
    // Given: Ready on address A
    let (mut control, driver, _tracker) = ready_loop("https://player.test/a").await;

    // When: Navigating to B where the player is not rendered
    driver.hide_player();
    driver.navigate("https://player.test/b");
    control.step().await;

    // Then: Not ready
    assert!(!control.is_ready());
    assert_eq!(control.state(), LoopState::Stale);

    // When: The player renders but the address stays B
    driver.show_player();
    control.step().await;

    // Then: Still stale, resolution is only retried on a context change
    assert!(!control.is_ready());

    // When: Navigating to C
    driver.navigate("https://player.test/c");
    control.step().await;

    // Then: Ready again
    assert!(control.is_ready());
}

/// WHAT: Focus is pulled back to the session window
/// WHY: Actions must target the player, not a stray tab
#[tokio::test]
async fn given_foreign_context_when_stepping_then_switches_back() {
    // Given: A Ready loop whose focus moved to another tab
    let (mut control, driver, _tracker) = ready_loop("https://player.test/").await;
    driver.page().context = "popup".to_string();
    let lookups = driver.page().lookups;

    // When: Stepping
    control.step().await;

    // Then: The loop switched back and stays Ready without re-resolution
    assert_eq!(
        driver.calls(),
        vec![Call::SwitchContext("home".to_string())]
    );
    assert_eq!(driver.page().lookups, lookups);
    assert!(control.is_ready());
}

/// WHAT: The consent overlay is clicked during resolution
/// WHY: It can cover the player controls
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_overlay_present_when_resolving_then_dismissed() {
    // Given: A player page with the consent banner
    let driver = ScriptedDriver::player("https://player.test/");
    let overlay = ControlLayout::default().overlay.unwrap();
    driver.page().elements.insert(
        overlay.value().to_string(),
        vec![ElementHandle::new("banner-close")],
    );
    let tracker = Arc::new(EventTracker::new());
    let mut control = ControlLoop::new(
        driver.clone(),
        tracker,
        ControlLayout::default(),
        LoopSettings::default(),
    )
    .await
    .unwrap();

    // When: Stepping once
    control.step().await;

    // Then: The banner was clicked and the loop is Ready
    assert_eq!(driver.calls(), vec![Call::Click("banner-close".to_string())]);
    assert!(control.is_ready());
}

/// WHAT: A failing overlay dismissal does not abort resolution
/// WHY: Transient UI errors are tolerated
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_overlay_click_fails_when_resolving_then_still_ready() {
    // Given: A banner whose close button cannot be clicked
    let driver = ScriptedDriver::player("https://player.test/");
    let overlay = ControlLayout::default().overlay.unwrap();
    {
        let mut page = driver.page();
        page.elements
            .insert(overlay.value().to_string(), vec![ElementHandle::new("x")]);
        page.fail_clicks = true;
    }
    let mut control = ControlLoop::new(
        driver.clone(),
        Arc::new(EventTracker::new()),
        ControlLayout::default(),
        LoopSettings::default(),
    )
    .await
    .unwrap();

    // When: Stepping once
    control.step().await;

    // Then: Resolution still succeeded
    assert!(control.is_ready());
}

/// WHAT: A failed click invalidates handles and forces re-resolution
/// WHY: The page may re-render without changing address
#[tokio::test]
async fn given_ready_when_click_fails_then_stale_then_recovers() {
    // Given: A Ready loop whose buttons went stale
    let (mut control, driver, tracker) = ready_loop("https://player.test/").await;
    driver.page().fail_clicks = true;

    // When: Next fires
    tracker.fire(Command::Next);
    control.step().await;

    // Then: The loop is Stale
    assert_eq!(control.state(), LoopState::Stale);

    // When: Clicks work again and the loop iterates
    driver.page().fail_clicks = false;
    let lookups = driver.page().lookups;
    control.step().await;

    // Then: Handles were re-resolved on the same address
    assert!(driver.page().lookups > lookups);
    assert!(control.is_ready());
}

/// WHAT: Driver read failures never stop the loop
/// WHY: Only Exit terminates the session
#[tokio::test]
async fn given_driver_failing_when_stepping_then_continues_not_ready() {
    // Given: A Ready loop whose browser stops answering
    let (mut control, driver, tracker) = ready_loop("https://player.test/").await;
    driver.page().fail_address = true;

    // When: A command fires and the loop iterates
    tracker.fire(Command::PlayPause);
    let step = control.step().await;

    // Then: The loop continues, not ready, command discarded
    assert_eq!(step, Step::Continue);
    assert!(!control.is_ready());
    assert!(driver.calls().is_empty());
    assert_eq!(tracker.peek(), None);

    // When: The browser recovers
    driver.page().fail_address = false;
    control.step().await;

    // Then: Ready again
    assert!(control.is_ready());
}

/// WHAT: Exit terminates within one iteration and releases once
/// WHY: The driver must be released exactly once on shutdown
#[tokio::test]
async fn given_exit_fired_when_stepping_then_terminated_and_released_once() {
    // Given: A Ready loop
    let (mut control, driver, tracker) = ready_loop("https://player.test/").await;

    // When: Exit fires, followed by a stray command, and the loop keeps stepping
    tracker.fire(Command::Exit);
    tracker.fire(Command::Next);
    let first = control.step().await;
    let second = control.step().await;

    // Then: Terminated on the first step, release called exactly once
    assert_eq!(first, Step::Terminated);
    assert_eq!(second, Step::Terminated);
    assert_eq!(control.state(), LoopState::Terminated);
    assert_eq!(driver.count(&Call::Release), 1);
    assert_eq!(driver.calls(), vec![Call::Release]);
}

/// WHAT: run() returns once Exit fires from another task
/// WHY: The loop must observe the mailbox without awaiting the listener
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_loop_when_exit_fired_concurrently_then_run_returns() {
    // Given: A loop with a short poll interval
    let driver = ScriptedDriver::player("https://player.test/");
    let tracker = Arc::new(EventTracker::new());
    let control = ControlLoop::new(
        driver.clone(),
        Arc::clone(&tracker),
        ControlLayout::default(),
        LoopSettings {
            poll_interval: Duration::from_millis(1),
            ..LoopSettings::default()
        },
    )
    .await
    .unwrap();

    // When: Next and then Exit fire while the loop runs
    let producer = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        tracker.fire(Command::Next);
        tokio::time::sleep(Duration::from_millis(20)).await;
        tracker.fire(Command::Exit);
    };
    tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(control.run(), producer);
    })
    .await
    .unwrap();

    // Then: Next was dispatched and the driver released once
    assert_eq!(driver.count(&Call::Click("next".to_string())), 1);
    assert_eq!(driver.count(&Call::Release), 1);
}

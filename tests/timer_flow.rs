mod common;

use std::{path::PathBuf, time::Duration};

use common::{harness, harness_with_period, wait_until};
use interval_chime::state::TickOutcome;

#[tokio::test]
async fn idle_display_shows_configured_duration() {
    let h = harness(60);

    assert_eq!(h.state.display_seconds().unwrap(), 60);
    assert!(!h.state.snapshot().unwrap().running);
}

#[tokio::test]
async fn set_duration_while_idle_updates_display_and_persists() {
    let h = harness(60);

    for n in [1, 45, 3600] {
        assert!(h.state.set_duration(n).unwrap());
        assert_eq!(h.state.display_seconds().unwrap(), n as u64);
    }

    let saves = h.store.saves();
    assert_eq!(saves.len(), 3);
    assert_eq!(saves[2].timer_duration_seconds, 3600);
}

#[tokio::test]
async fn rejected_durations_change_nothing() {
    let h = harness(60);

    assert!(!h.state.set_duration(0).unwrap());
    assert!(!h.state.set_duration(-5).unwrap());
    assert!(!h.state.set_duration_text("25:99:00").unwrap());
    assert!(!h.state.set_duration_text("abc").unwrap());

    assert_eq!(h.state.config().unwrap().duration_seconds, 60);
    assert!(h.store.saves().is_empty());
}

#[tokio::test]
async fn duration_text_is_parsed() {
    let h = harness(60);

    assert!(h.state.set_duration_text("1:30").unwrap());
    assert_eq!(h.state.display_seconds().unwrap(), 90);
}

#[tokio::test]
async fn ticks_count_down_alarm_and_restart() {
    let h = harness(3);
    h.state.start().unwrap();

    let mut shown = Vec::new();
    for _ in 0..4 {
        h.state.tick().unwrap();
        shown.push(h.state.display_seconds().unwrap());
    }

    assert_eq!(shown, vec![2, 1, 0, 3]);
    wait_until(|| h.player.count("alert") == 1).await;
    assert!(h.state.playback_active());
}

#[tokio::test]
async fn alarm_plays_configured_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let h = harness(1);
    h.state.set_sound_path(Some(file.path().to_path_buf())).unwrap();
    h.state.start().unwrap();

    h.state.tick().unwrap();
    let outcome = h.state.tick().unwrap();

    assert_eq!(
        outcome,
        TickOutcome::Alarm {
            sound_path: Some(file.path().to_path_buf())
        }
    );
    let expected = format!("file:{}", file.path().display());
    wait_until(|| h.player.events().contains(&expected)).await;
}

#[tokio::test]
async fn each_alarm_stops_the_previous_one() {
    let h = harness(1);
    h.state.start().unwrap();

    h.state.tick().unwrap();
    h.state.tick().unwrap();
    wait_until(|| h.state.sound.is_sounding()).await;
    h.state.tick().unwrap();
    h.state.tick().unwrap();

    wait_until(|| h.player.count("alert") == 2).await;
    assert_eq!(h.player.events(), vec!["alert", "purge", "alert"]);
}

#[tokio::test]
async fn stop_resets_display_and_silences_alarm() {
    let h = harness(2);
    h.state.start().unwrap();
    for _ in 0..3 {
        h.state.tick().unwrap();
    }
    wait_until(|| h.state.sound.is_sounding()).await;

    let snapshot = h.state.stop().unwrap();

    assert!(!snapshot.running);
    assert_eq!(h.state.display_seconds().unwrap(), 2);
    assert!(!h.state.playback_active());
    assert_eq!(h.player.events(), vec!["alert", "purge"]);
}

#[tokio::test]
async fn stop_while_idle_is_a_no_op() {
    let h = harness(5);

    let snapshot = h.state.stop().unwrap();

    assert!(!snapshot.running);
    assert_eq!(snapshot.display_seconds, 5);
    assert!(h.player.events().is_empty());
    assert_eq!(h.state.get_last_action().0, None);
}

#[tokio::test]
async fn tick_after_stop_does_nothing() {
    let h = harness(2);
    h.state.start().unwrap();
    h.state.stop().unwrap();

    assert_eq!(h.state.tick().unwrap(), TickOutcome::Idle);
    assert_eq!(h.state.display_seconds().unwrap(), 2);
}

#[tokio::test]
async fn set_duration_while_running_applies_at_next_reset() {
    let h = harness(3);
    h.state.start().unwrap();
    h.state.tick().unwrap();

    assert!(h.state.set_duration(10).unwrap());
    assert_eq!(h.state.display_seconds().unwrap(), 2);

    h.state.stop().unwrap();
    assert_eq!(h.state.display_seconds().unwrap(), 10);
}

#[tokio::test]
async fn sound_path_changes_are_persisted() {
    let h = harness(60);

    h.state.set_sound_path(Some(PathBuf::from("/tmp/bell.wav"))).unwrap();
    h.state.set_sound_path(None).unwrap();

    let saves = h.store.saves();
    assert_eq!(saves[0].alarm_sound_path, Some(PathBuf::from("/tmp/bell.wav")));
    assert_eq!(saves[1].alarm_sound_path, None);
    assert_eq!(saves[1].timer_duration_seconds, 60);
}

#[tokio::test]
async fn subscribers_see_every_tick() {
    let h = harness(5);
    let mut updates = h.state.subscribe();
    h.state.start().unwrap();
    h.state.tick().unwrap();

    assert!(updates.has_changed().unwrap());
    let snapshot = *updates.borrow_and_update();
    assert!(snapshot.running);
    assert_eq!(snapshot.display_seconds, 4);
}

#[tokio::test]
async fn shutdown_silences_alarm_even_while_running() {
    let h = harness(1);
    h.state.start().unwrap();
    h.state.tick().unwrap();
    h.state.tick().unwrap();
    wait_until(|| h.state.sound.is_sounding()).await;

    h.state.shutdown();

    assert!(!h.state.playback_active());
    assert_eq!(h.player.count("purge"), 1);
}

#[tokio::test]
async fn shutdown_when_idle_is_harmless() {
    let h = harness(1);

    h.state.shutdown();
    h.state.shutdown();

    assert!(h.player.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn schedule_ticks_once_per_second() {
    let h = harness_with_period(5, Duration::from_secs(1));
    h.state.start().unwrap();

    for expected in [4, 3, 2] {
        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(h.state.display_seconds().unwrap(), expected);
    }

    h.state.stop().unwrap();
    tokio::time::advance(Duration::from_secs(3)).await;
    tokio::task::yield_now().await;
    assert_eq!(h.state.display_seconds().unwrap(), 5);
}

#[tokio::test(start_paused = true)]
async fn restart_uses_a_fresh_schedule() {
    let h = harness_with_period(5, Duration::from_secs(1));
    h.state.start().unwrap();
    tokio::time::advance(Duration::from_secs(2)).await;
    tokio::task::yield_now().await;
    h.state.stop().unwrap();

    h.state.start().unwrap();
    tokio::time::advance(Duration::from_secs(1)).await;
    tokio::task::yield_now().await;

    assert_eq!(h.state.display_seconds().unwrap(), 4);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_the_tick_schedule() {
    let h = harness_with_period(5, Duration::from_secs(1));
    h.state.start().unwrap();
    tokio::time::advance(Duration::from_secs(1)).await;
    tokio::task::yield_now().await;
    assert_eq!(h.state.display_seconds().unwrap(), 4);

    h.state.shutdown();
    tokio::time::advance(Duration::from_secs(3)).await;
    tokio::task::yield_now().await;

    assert_eq!(h.state.display_seconds().unwrap(), 4);
}

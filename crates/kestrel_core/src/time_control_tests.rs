use super::*;

#[test]
fn test_movetime_overrides_clock() {
    let params = GoParams {
        move_time: Some(500),
        wtime: Some(60_000),
        winc: Some(1_000),
        ..Default::default()
    };
    assert_eq!(
        allocate_move_time(Color::White, &params),
        Some(Duration::from_millis(500))
    );
}

#[test]
fn test_infinite_disables_clock() {
    let params = GoParams {
        infinite: true,
        wtime: Some(60_000),
        ..Default::default()
    };
    assert_eq!(allocate_move_time(Color::White, &params), None);
}

#[test]
fn test_allocation_formula() {
    // 60s remaining, 1s increment, default 30 moves to go:
    // base = 2000, alloc = min(2000 + 750, 15000) = 2750.
    let params = GoParams {
        wtime: Some(60_000),
        winc: Some(1_000),
        ..Default::default()
    };
    assert_eq!(
        allocate_move_time(Color::White, &params),
        Some(Duration::from_millis(2_750))
    );

    // The mover's own clock is consulted.
    let params = GoParams {
        wtime: Some(60_000),
        btime: Some(4_000),
        ..Default::default()
    };
    assert_eq!(
        allocate_move_time(Color::Black, &params),
        Some(Duration::from_millis(4_000 / 30))
    );
}

#[test]
fn test_allocation_caps_at_quarter_of_remaining() {
    // Tiny clock, huge increment: the quarter-clock cap kicks in.
    let params = GoParams {
        wtime: Some(1_000),
        winc: Some(10_000),
        moves_to_go: Some(1),
        ..Default::default()
    };
    assert_eq!(
        allocate_move_time(Color::White, &params),
        Some(Duration::from_millis(250))
    );
}

#[test]
fn test_no_clock_data_means_no_budget() {
    let params = GoParams::default();
    assert_eq!(allocate_move_time(Color::White, &params), None);
}

#[test]
fn test_stop_flag_transitions_once() {
    let tc = TimeControl::new(None);
    tc.start();
    assert!(!tc.is_stopped());
    tc.stop();
    assert!(tc.is_stopped());

    // Clones share the flag.
    let tc2 = tc.clone();
    assert!(tc2.is_stopped());
}

#[test]
fn test_check_time_trips_on_expiry() {
    let tc = TimeControl::new(Some(Duration::ZERO));
    tc.start();
    assert!(tc.check_time());
    assert!(tc.is_stopped());
}

#[test]
fn test_check_cadence() {
    let tc = TimeControl::new(None);
    assert!(tc.should_check_time(0));
    assert!(tc.should_check_time(1024));
    assert!(tc.should_check_time(2048));
    assert!(!tc.should_check_time(1000));
}

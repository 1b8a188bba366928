use super::*;
use kestrel_core::legal_moves;
use std::time::Duration;

fn search_depth(fen: &str, depth: u8) -> SearchResult {
    let pos = Position::from_fen(fen).unwrap();
    let mut engine = AlphaBetaEngine::new();
    engine.search(&pos, SearchLimits::depth(depth))
}

#[test]
fn test_depth_one_returns_a_legal_move() {
    let pos = Position::startpos();
    let mut engine = AlphaBetaEngine::new();
    let result = engine.search(&pos, SearchLimits::depth(1));

    let best = result.best_move.expect("startpos has moves");
    assert!(legal_moves(&pos).contains(&best));
    assert!(result.score.abs() < MATE_THRESHOLD);
    assert_eq!(result.depth, 1);
    assert!(result.nodes > 0);
    assert!(!result.pv.is_empty());
}

#[test]
fn test_finds_back_rank_mate_in_one() {
    let result = search_depth("6k1/5ppp/8/8/8/8/8/4R2K w - - 0 1", 3);
    assert!(result.score >= MATE_THRESHOLD, "score {} not a mate", result.score);
    assert_eq!(result.score, MATE - 1);

    let best = result.best_move.unwrap();
    assert_eq!(kestrel_core::move_to_uci(&best), "e1e8");
}

#[test]
fn test_queen_mate_in_one() {
    // Qe8 is mate: the e-file is open and the back rank is fenced in by the
    // black pawns.
    let result = search_depth("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1", 3);
    assert!(result.score >= MATE_THRESHOLD);
    let best = result.best_move.unwrap();
    assert_eq!(kestrel_core::move_to_uci(&best), "e1e8");
}

#[test]
fn test_cornered_king_rook_endgame_keeps_the_rook_safe() {
    // No forced mate at this horizon: Rg8+ would simply be captured, so the
    // search must keep a winning, non-sacrificial score.
    let result = search_depth("7k/6R1/6K1/8/8/8/8/8 w - - 0 1", 3);
    let best = result.best_move.unwrap();
    assert_ne!(
        kestrel_core::move_to_uci(&best),
        "g7g8",
        "hung the rook to the bare king"
    );
    assert!(result.score > 400, "rook-up endgame scored {}", result.score);
    assert!(result.score < MATE_THRESHOLD);
}

#[test]
fn test_mated_side_sees_losing_score() {
    // Black to move, about to be mated by Qe8 next move whatever happens.
    let result = search_depth("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 b - - 0 1", 3);
    assert!(result.score < -400, "losing side scored {}", result.score);
}

#[test]
fn test_stalemate_root_returns_no_move_and_zero() {
    let result = search_depth("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, 0);
    assert!(result.pv.is_empty());
}

#[test]
fn test_score_is_negamax_symmetric() {
    // A queen up for White: positive for White to move, negative for Black.
    let up = search_depth("k7/8/8/8/8/8/8/1KQ5 w - - 0 1", 2);
    let down = search_depth("k7/8/8/8/8/8/8/1KQ5 b - - 0 1", 2);
    assert!(up.score > 500, "white should be winning, got {}", up.score);
    assert!(down.score < -500, "black should be losing, got {}", down.score);
}

#[test]
fn test_ruy_lopez_midgame_search_is_sane() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";
    let result = search_depth(fen, 4);
    let best = result.best_move.expect("black has moves");
    let pos = Position::from_fen(fen).unwrap();
    assert!(legal_moves(&pos).contains(&best));
    assert_eq!(result.depth, 4);
    assert!(result.seldepth >= result.depth);
}

#[test]
fn test_quiescence_resolves_hanging_captures() {
    // White queen can take a pawn but loses the queen to a recapture; a
    // depth-1 search without quiescence would grab it anyway.
    let fen = "k3r3/4p3/8/8/8/8/4Q3/K7 w - - 0 1";
    let result = search_depth(fen, 1);
    let best = result.best_move.unwrap();
    assert_ne!(
        kestrel_core::move_to_uci(&best),
        "e2e7",
        "queen took a defended pawn"
    );
}

#[test]
fn test_node_limit_stops_search() {
    let pos = Position::startpos();
    let mut limits = SearchLimits::depth(30);
    limits.max_nodes = Some(2_000);
    let mut engine = AlphaBetaEngine::new();
    let result = engine.search(&pos, limits);

    assert!(result.stopped);
    assert!(result.best_move.is_some());
    // The poll interval is 1024 nodes, so overshoot stays bounded.
    assert!(result.nodes < 2_000 + 1_024 * 2);
}

#[test]
fn test_external_stop_yields_a_move() {
    // The flag is up before the search even starts; the fallback first
    // legal move must come back.
    let pos = Position::startpos();
    let limits = SearchLimits::depth(30);
    limits.time_control.start();
    limits.time_control.stop();

    let mut engine = AlphaBetaEngine::new();
    let result = engine.search(&pos, limits);
    assert!(result.stopped);
    let best = result.best_move.expect("fallback move expected");
    assert!(legal_moves(&pos).contains(&best));
}

#[test]
fn test_time_budget_stops_search() {
    let pos = Position::startpos();
    let limits = SearchLimits::depth_and_time(30, Duration::from_millis(50));
    let mut engine = AlphaBetaEngine::new();
    let start = std::time::Instant::now();
    let result = engine.search(&pos, limits);

    assert!(result.best_move.is_some());
    assert!(
        start.elapsed() < Duration::from_secs(5),
        "search ignored its clock"
    );
}

#[test]
fn test_pv_is_playable() {
    let result = search_depth(
        "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
        3,
    );
    let mut pos =
        Position::from_fen("r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3")
            .unwrap();
    assert!(!result.pv.is_empty());
    for mv in &result.pv {
        assert!(
            legal_moves(&pos).contains(mv),
            "PV move {mv} is not legal in sequence"
        );
        pos.make(mv);
    }
}

#[test]
fn test_infinite_search_stops_promptly_on_external_stop() {
    let pos = Position::startpos();
    let mut limits = SearchLimits::depth(60);
    limits.infinite = true;
    limits.start();
    let tc = limits.time_control.clone();

    let worker = std::thread::spawn(move || {
        let mut engine = AlphaBetaEngine::new();
        engine.search(&pos, limits)
    });

    std::thread::sleep(Duration::from_millis(100));
    tc.stop();
    let joined_at = std::time::Instant::now();
    let result = worker.join().unwrap();

    assert!(
        joined_at.elapsed() < Duration::from_millis(500),
        "search did not unwind promptly after stop"
    );
    assert!(result.stopped);
    assert!(result.best_move.is_some());
}

#[test]
fn test_mate_score_formatting() {
    assert_eq!(score_string(MATE - 1), "mate 1");
    assert_eq!(score_string(MATE - 3), "mate 2");
    assert_eq!(score_string(-(MATE - 2)), "mate -1");
    assert_eq!(score_string(150), "cp 150");
    assert_eq!(score_string(-42), "cp -42");
}

#[test]
fn test_mvv_lva_ordering_sanity() {
    // Pawn takes queen must outrank queen takes pawn.
    let pxq = MVV_LVA[PieceKind::Pawn.idx() + 1][PieceKind::Queen.idx() + 1];
    let qxp = MVV_LVA[PieceKind::Queen.idx() + 1][PieceKind::Pawn.idx() + 1];
    assert!(pxq > qxp);

    // Bigger victims dominate; cheaper attackers break ties.
    let pxr = MVV_LVA[PieceKind::Pawn.idx() + 1][PieceKind::Rook.idx() + 1];
    let nxr = MVV_LVA[PieceKind::Knight.idx() + 1][PieceKind::Rook.idx() + 1];
    assert!(pxq > pxr);
    assert!(pxr > nxr);
}

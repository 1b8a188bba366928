//! UCI front end: reads commands from stdin, runs the search on a worker
//! thread, and keeps stdin responsive so `stop` can cancel a running search.
//!
//! Malformed commands are ignored; option problems are reported as
//! `info string` lines. The process exits 0 after `quit`.

use std::io::{self, BufRead, Write};
use std::thread::JoinHandle;

use kestrel_core::{
    Engine, GoParams, Position, PositionSetupError, SearchLimits, TimeControl, move_to_uci,
    set_position_from_uci,
};
use kestrel_engine::AlphaBetaEngine;

const ENGINE_NAME: &str = "Kestrel 0.1.0";
const ENGINE_AUTHOR: &str = "the Kestrel authors";

fn main() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut state = UciState::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = state.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    state.join_search();
    Ok(())
}

/// Reserved options we accept and remember; the core search does not consult
/// them yet.
struct EngineOptions {
    hash_mb: i32,
    threads: i32,
    own_book: bool,
    contempt: i32,
}

impl EngineOptions {
    fn new() -> Self {
        Self {
            hash_mb: 128,
            threads: 1,
            own_book: false,
            contempt: 0,
        }
    }
}

/// A running search: its worker thread plus the shared stop flag.
struct ActiveSearch {
    worker: JoinHandle<()>,
    time_control: TimeControl,
}

struct UciState {
    position: Position,
    options: EngineOptions,
    search: Option<ActiveSearch>,
}

impl UciState {
    fn new() -> Self {
        Self {
            position: Position::startpos(),
            options: EngineOptions::new(),
            search: None,
        }
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }
        let mut parts = trimmed.split_whitespace();
        let command = parts.next().unwrap_or_default();

        match command {
            "uci" => {
                writeln!(out, "id name {ENGINE_NAME}")?;
                writeln!(out, "id author {ENGINE_AUTHOR}")?;
                writeln!(out, "option name Hash type spin default 128 min 1 max 16384")?;
                writeln!(out, "option name Threads type spin default 1 min 1 max 256")?;
                writeln!(out, "option name OwnBook type check default false")?;
                writeln!(out, "option name Contempt type spin default 0 min -100 max 100")?;
                writeln!(out, "uciok")?;
            }
            "isready" => {
                writeln!(out, "readyok")?;
            }
            "ucinewgame" => {
                self.join_search();
                self.position = Position::startpos();
            }
            "position" => {
                self.join_search();
                let args: Vec<&str> = parts.collect();
                match set_position_from_uci(&mut self.position, &args) {
                    Ok(()) => {}
                    Err(PositionSetupError::Move(err)) => {
                        writeln!(out, "info string Invalid move: {}", err.move_text())?;
                    }
                    Err(PositionSetupError::Fen(err)) => {
                        writeln!(out, "info string Invalid FEN: {err}")?;
                    }
                }
            }
            "go" => {
                self.join_search();
                let params = parse_go(parts);
                self.start_search(params);
            }
            "stop" => {
                self.join_search();
            }
            "setoption" => {
                self.handle_setoption(trimmed, out)?;
            }
            "debug" | "register" | "ponderhit" => {
                // Accepted for protocol compatibility; nothing to do.
            }
            "quit" => {
                return Ok(true);
            }
            _ => {
                // Unknown commands are ignored per protocol.
            }
        }
        Ok(false)
    }

    fn start_search(&mut self, params: GoParams) {
        let pos = self.position.clone();
        let mut limits = SearchLimits::from_go(pos.side_to_move(), &params);
        limits.verbose = true;
        limits.start();
        let time_control = limits.time_control.clone();

        let worker = std::thread::spawn(move || {
            let mut engine = AlphaBetaEngine::new();
            let result = engine.search(&pos, limits);
            match result.best_move {
                Some(mv) => println!("bestmove {}", move_to_uci(&mv)),
                None => println!("bestmove (none)"),
            }
            io::stdout().flush().ok();
        });

        self.search = Some(ActiveSearch { worker, time_control });
    }

    /// Signal the running search (if any) and wait for it to unwind; the
    /// worker prints its own `bestmove` before exiting.
    fn join_search(&mut self) {
        if let Some(active) = self.search.take() {
            active.time_control.stop();
            active.worker.join().ok();
        }
    }

    fn handle_setoption(&mut self, line: &str, out: &mut impl Write) -> io::Result<()> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let name_at = match tokens.iter().position(|&t| t == "name") {
            Some(i) => i + 1,
            None => return Ok(()),
        };
        let value_at = tokens.iter().position(|&t| t == "value");
        let name_end = value_at.unwrap_or(tokens.len());
        let name = tokens[name_at..name_end].join(" ");
        let value = value_at
            .map(|i| tokens[i + 1..].join(" "))
            .unwrap_or_default();

        match name.as_str() {
            "Hash" => match value.parse::<i32>() {
                Ok(v) if (1..=16384).contains(&v) => self.options.hash_mb = v,
                _ => writeln!(out, "info string Invalid Hash value: {value}")?,
            },
            "Threads" => match value.parse::<i32>() {
                Ok(v) if (1..=256).contains(&v) => self.options.threads = v,
                _ => writeln!(out, "info string Invalid Threads value: {value}")?,
            },
            "OwnBook" => match value.as_str() {
                "true" => self.options.own_book = true,
                "false" => self.options.own_book = false,
                _ => writeln!(out, "info string Invalid OwnBook value: {value}")?,
            },
            "Contempt" => match value.parse::<i32>() {
                Ok(v) if (-100..=100).contains(&v) => self.options.contempt = v,
                _ => writeln!(out, "info string Invalid Contempt value: {value}")?,
            },
            _ => {
                // Unknown option names are ignored.
            }
        }
        Ok(())
    }
}

fn parse_go<'a>(parts: impl Iterator<Item = &'a str>) -> GoParams {
    let mut params = GoParams::default();
    let tokens: Vec<&str> = parts.collect();
    let mut i = 0;
    while i < tokens.len() {
        let value = tokens.get(i + 1);
        match tokens[i] {
            "depth" => {
                params.depth = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "movetime" => {
                params.move_time = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "nodes" => {
                params.nodes = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "wtime" => {
                params.wtime = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "btime" => {
                params.btime = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "winc" => {
                params.winc = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "binc" => {
                params.binc = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "movestogo" => {
                params.moves_to_go = value.and_then(|v| v.parse().ok());
                i += 2;
            }
            "infinite" => {
                params.infinite = true;
                i += 1;
            }
            _ => {
                i += 1;
            }
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_go_full_clock() {
        let params = parse_go(
            "wtime 60000 btime 55000 winc 1000 binc 1000 movestogo 20"
                .split_whitespace(),
        );
        assert_eq!(params.wtime, Some(60_000));
        assert_eq!(params.btime, Some(55_000));
        assert_eq!(params.winc, Some(1_000));
        assert_eq!(params.moves_to_go, Some(20));
        assert!(!params.infinite);
    }

    #[test]
    fn test_parse_go_depth_and_nodes() {
        let params = parse_go("depth 6 nodes 500000".split_whitespace());
        assert_eq!(params.depth, Some(6));
        assert_eq!(params.nodes, Some(500_000));
    }

    #[test]
    fn test_parse_go_infinite_and_junk() {
        let params = parse_go("infinite frobnicate 12".split_whitespace());
        assert!(params.infinite);
        assert_eq!(params.depth, None);
    }

    #[test]
    fn test_setoption_rejects_bad_values() {
        let mut state = UciState::new();
        let mut sink = Vec::new();
        state
            .handle_setoption("setoption name Hash value 0", &mut sink)
            .unwrap();
        assert_eq!(state.options.hash_mb, 128);
        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("Invalid Hash value: 0"));

        let mut sink = Vec::new();
        state
            .handle_setoption("setoption name Contempt value 25", &mut sink)
            .unwrap();
        assert_eq!(state.options.contempt, 25);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_position_and_go_produce_bestmove() {
        let mut state = UciState::new();
        let mut sink = Vec::new();
        state
            .handle_command("position startpos moves e2e4 e7e5", &mut sink)
            .unwrap();
        assert_eq!(state.position.side_to_move(), kestrel_core::Color::White);

        state.handle_command("go depth 2", &mut sink).unwrap();
        // The worker owns stdout; joining proves a search ran to completion.
        state.join_search();
    }
}

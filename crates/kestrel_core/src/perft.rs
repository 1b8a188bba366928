//! Perft: depth-bounded legal-move leaf counts for validating generation.

use crate::board::Position;
use crate::movegen::legal_moves_into;
use crate::types::Move;

/// Count all legal positions reachable from `pos` in exactly `depth` plies.
pub fn perft(pos: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    fn inner(pos: &mut Position, depth: u8, layers: &mut [Vec<Move>]) -> u64 {
        if depth == 0 {
            return 1;
        }

        let (buf, rest) = layers
            .split_first_mut()
            .expect("perft requires one buffer per remaining ply");

        legal_moves_into(pos, buf);
        if depth == 1 {
            return buf.len() as u64;
        }

        // Moves are consumed by index so the buffer can be handed down.
        let count = buf.len();
        let mut nodes = 0u64;
        for i in 0..count {
            let mv = buf[i].clone();
            pos.make(&mv);
            nodes += inner(pos, depth - 1, rest);
            pos.unmake();
        }
        nodes
    }

    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(pos, depth, &mut layers[..])
}

/// Per-root-move breakdown, as printed by the profiling example.
pub fn perft_divide(pos: &mut Position, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut roots = Vec::with_capacity(64);
    legal_moves_into(pos, &mut roots);

    let mut out = Vec::with_capacity(roots.len());
    for mv in roots {
        pos.make(&mv);
        let nodes = perft(pos, depth - 1);
        pos.unmake();
        out.push((mv, nodes));
    }
    out
}

//! Quantum State Integration Tests
//!
//! Invariants of the weighted branch collection, checked directly on
//! [`QuantumBoardState`] and across seeded random playouts:
//! - no two branches share an occupancy
//! - weights stay normalized and add up to the stored total
//! - presences on a cell never exceed one; each piece sums to one
//! - classic moves conserve weight up to the normalization divisor

use num_bigint::BigUint;
use num_traits::One;
use quantum_chess::game::rules::RuleContext;
use quantum_chess::game::state::weight::gcd_all;
use quantum_chess::game::{
    BoardExtent, Cell, ChessGame, ClassicBoardState, ClassicMove, ClassicPiece, GameSetup, PieceId,
    PieceRegistry, PieceType, Player, QuantumBoardState, QuantumMove,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const EPS: f64 = 1e-9;

/// Check every structural invariant of a game's current state
fn assert_invariants(game: &ChessGame) {
    let state = game.state();
    assert!(state.branch_count() > 0);

    let mut seen = HashSet::new();
    for branch in state.branches() {
        assert!(seen.insert(branch.occupancy().clone()), "duplicate branch occupancy");
    }

    let sum: BigUint = state.branches().iter().map(|b| b.weight()).sum();
    assert_eq!(state.total_weight(), &sum);
    assert!(gcd_all(state.branches().iter().map(|b| b.weight())).is_one());

    let meaning = game.meaning();
    for (at, pieces) in meaning.iter() {
        let total: f64 = pieces.iter().map(|p| p.presence).sum();
        assert!(total <= 1.0 + EPS, "presence on {at} sums to {total}");
    }
    for piece in game.pieces().iter() {
        let total: f64 = meaning.instances_of(piece.id).iter().map(|p| p.presence).sum();
        assert!((total - 1.0).abs() < 1e-6, "presence of {} sums to {total}", piece.id);
    }
}

/// Play `plies` random legal moves, checking invariants after each
fn random_playout(seed: u64, plies: usize) -> ChessGame {
    let mut game = GameSetup::standard().build().unwrap().with_seed(seed);
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));

    for _ in 0..plies {
        let meaning = game.meaning();
        let mut candidates = Vec::new();
        for (at, pieces) in meaning.iter() {
            for p in pieces {
                let destinations: Vec<Cell> = game.legal_destinations(p.id(), at).unwrap().into_iter().collect();
                if !destinations.is_empty() {
                    candidates.push((p.id(), p.piece.piece_type, at, destinations));
                }
            }
        }
        if candidates.is_empty() {
            break;
        }

        let (id, piece_type, origin, destinations) = &candidates[rng.random_range(0..candidates.len())];
        let first = destinations[rng.random_range(0..destinations.len())];
        let split = piece_type.can_quantum_move()
            && destinations.len() > 1
            && game.state().branch_count() < 64
            && rng.random_bool(0.5);

        let targets = if split {
            let second = loop {
                let c = destinations[rng.random_range(0..destinations.len())];
                if c != first {
                    break c;
                }
            };
            vec![first, second]
        } else {
            vec![first]
        };

        game.try_move(*id, *origin, &targets).unwrap();
        assert_invariants(&game);
    }

    game
}

fn registry(pieces: &[(u16, Player, PieceType)]) -> PieceRegistry {
    pieces
        .iter()
        .map(|&(id, player, piece_type)| ClassicPiece::new(player, PieceId(id), piece_type))
        .collect()
}

fn branch(placements: &[(&str, u16)]) -> ClassicBoardState {
    ClassicBoardState::from_placements(
        placements
            .iter()
            .map(|&(at, id)| (Cell::from_algebraic(at).unwrap(), PieceId(id))),
    )
    .unwrap()
}

fn cell(s: &str) -> Cell {
    Cell::from_algebraic(s).unwrap()
}

// ============================================================================
// Playout Tests
// ============================================================================

#[test]
fn test_random_playouts_keep_invariants() {
    for seed in 0..6 {
        let game = random_playout(seed, 30);
        assert!(game.history().len() <= 30);
    }
}

#[test]
fn test_playouts_are_deterministic_per_seed() {
    let a = random_playout(42, 20);
    let b = random_playout(42, 20);
    assert_eq!(a.state(), b.state());
    assert_eq!(a.history(), b.history());
}

// ============================================================================
// Direct State Tests
// ============================================================================

#[test]
fn test_quantum_move_doubles_branches_with_parent_weights() {
    let pieces = registry(&[(0, Player::White, PieceType::Queen)]);
    let ctx = RuleContext::new(&pieces, BoardExtent::STANDARD, None);
    let mut state = QuantumBoardState::new(branch(&[("d1", 0)]));
    let mv = QuantumMove {
        player: Player::White,
        piece_id: PieceId(0),
        origin: cell("d1"),
        targets: [cell("d4"), cell("h5")],
    };

    let report = state.quantum_move(&ctx, &mv).unwrap();
    assert_eq!(report.applied, 2);
    assert_eq!(report.consolidation.merged, 0);
    assert_eq!(state.branch_count(), 2);
    assert_eq!(state.total_weight(), &BigUint::from(2u32));
    assert!((state.presence_at(PieceId(0), cell("d4")) - 0.5).abs() < EPS);
    assert!((state.presence_at(PieceId(0), cell("h5")) - 0.5).abs() < EPS);
}

#[test]
fn test_classic_move_conserves_weight_up_to_divisor() {
    //! Merging the two images of a rejoined piece triggers a normalization
    let pieces = registry(&[(0, Player::White, PieceType::Rook)]);
    let ctx = RuleContext::new(&pieces, BoardExtent::STANDARD, None);
    let mut state = QuantumBoardState::new(branch(&[("a1", 0)]));
    state
        .quantum_move(
            &ctx,
            &QuantumMove {
                player: Player::White,
                piece_id: PieceId(0),
                origin: cell("a1"),
                targets: [cell("a4"), cell("d1")],
            },
        )
        .unwrap();
    let before = state.total_weight().clone();

    let mut rng = StdRng::seed_from_u64(0);
    let mv = ClassicMove {
        player: Player::White,
        piece_id: PieceId(0),
        origin: cell("a4"),
        target: cell("a1"),
        measures_origin: false,
        measures_target: false,
        is_castling: false,
    };
    let report = state.classic_move(&ctx, &mv, &mut rng).unwrap();
    assert_eq!(report.applied, 1);
    // {a1: 1}, {d1: 1} after the move: no merge yet
    assert_eq!(&before, &(state.total_weight() * &report.consolidation.divisor));

    let mv = ClassicMove {
        origin: cell("d1"),
        target: cell("a1"),
        ..mv
    };
    let report = state.classic_move(&ctx, &mv, &mut rng).unwrap();
    assert_eq!(report.consolidation.merged, 1);
    assert_eq!(report.consolidation.divisor, BigUint::from(2u32));
    assert_eq!(&before, &(state.total_weight() * &report.consolidation.divisor));
    assert_eq!(state.branch_count(), 1);
    assert!(state.total_weight().is_one());
}

#[test]
fn test_illegal_branches_left_unchanged() {
    //! A classic move only takes effect where it is legal in that branch
    let pieces = registry(&[
        (0, Player::White, PieceType::Rook),
        (1, Player::White, PieceType::Knight),
    ]);
    let ctx = RuleContext::new(&pieces, BoardExtent::STANDARD, None);
    let mut state = QuantumBoardState::from_branches(vec![
        branch(&[("a1", 0), ("a2", 1)]),
        branch(&[("a1", 0), ("c3", 1)]),
    ])
    .unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let mv = ClassicMove {
        player: Player::White,
        piece_id: PieceId(0),
        origin: cell("a1"),
        target: cell("a5"),
        measures_origin: false,
        measures_target: false,
        is_castling: false,
    };
    let report = state.classic_move(&ctx, &mv, &mut rng).unwrap();

    assert_eq!(report.applied, 1);
    assert!((state.presence_at(PieceId(0), cell("a1")) - 0.5).abs() < EPS);
    assert!((state.presence_at(PieceId(0), cell("a5")) - 0.5).abs() < EPS);
}

#[test]
fn test_measure_respects_weights_over_many_draws() {
    //! Sampled outcomes follow the branch weights
    let pieces = registry(&[(0, Player::White, PieceType::Knight)]);
    let ctx = RuleContext::new(&pieces, BoardExtent::STANDARD, None);
    let mut base = QuantumBoardState::new(branch(&[("b1", 0)]));
    // b1 -> {a3, c3}, then a3 -> {b1, c4}: c3 keeps weight 2 of 4
    base.quantum_move(
        &ctx,
        &QuantumMove {
            player: Player::White,
            piece_id: PieceId(0),
            origin: cell("b1"),
            targets: [cell("a3"), cell("c3")],
        },
    )
    .unwrap();
    base.quantum_move(
        &ctx,
        &QuantumMove {
            player: Player::White,
            piece_id: PieceId(0),
            origin: cell("a3"),
            targets: [cell("b1"), cell("c4")],
        },
    )
    .unwrap();
    assert!((base.presence_at(PieceId(0), cell("c3")) - 0.5).abs() < EPS);

    let mut rng = StdRng::seed_from_u64(1234);
    let mut hits = 0;
    let draws = 2000;
    for _ in 0..draws {
        let mut state = base.clone();
        if state.measure(cell("c3"), &mut rng).unwrap().occupant.is_some() {
            hits += 1;
        }
    }
    let rate = hits as f64 / draws as f64;
    assert!((rate - 0.5).abs() < 0.05, "hit rate {rate}");
}

#[test]
fn test_consolidation_is_idempotent() {
    let game = random_playout(9, 12);
    let mut state = game.state().clone();
    let report = state.consolidate().unwrap();
    assert_eq!(report.merged, 0);
    assert!(report.divisor.is_one());
    assert_eq!(&state, game.state());
}

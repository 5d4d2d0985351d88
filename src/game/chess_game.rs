//! Game orchestrator
//!
//! [`ChessGame`] owns the board extent, the piece registry, the current
//! [`QuantumBoardState`] and the move history. Move requests are validated
//! against the Ruleset's aggregate destinations, turned into a [`Move`]
//! record and handed to the quantum state.
//!
//! # Atomicity
//!
//! Moves are applied to a clone of the current quantum state, which replaces
//! the current one only when every step succeeded. A rejected request leaves
//! state, history and listeners untouched.
//!
//! # Notification
//!
//! Hooks registered with [`ChessGame::on_move`] and channels handed out by
//! [`ChessGame::subscribe`] receive a [`MoveEvent`] after every commit.

use crate::game::error::{GameError, GameResult};
use crate::game::history::MoveHistory;
use crate::game::moves::{ClassicMove, Move, MoveEvent, QuantumMove};
use crate::game::pieces::{ClassicPiece, PieceId, PieceRegistry, PieceType};
use crate::game::rules::{aggregate_destinations, RuleContext};
use crate::game::state::weight::ratio;
use crate::game::state::{
    BoardMeaning, ClassicBoardState, MoveReport, PieceLocation, QuantumBoardState, RealPiece,
};
use crate::game::types::{BoardExtent, Cell};
use crossbeam_channel::{Receiver, Sender};
use num_traits::Zero;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{info, warn};

type MoveHook = Box<dyn FnMut(&MoveEvent) + Send>;

pub struct ChessGame {
    extent: BoardExtent,
    pieces: PieceRegistry,
    state: QuantumBoardState,
    history: MoveHistory,
    rng: StdRng,
    hooks: Vec<MoveHook>,
    subscribers: Vec<Sender<MoveEvent>>,
}

impl fmt::Debug for ChessGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChessGame")
            .field("extent", &self.extent)
            .field("pieces", &self.pieces.len())
            .field("branches", &self.state.branch_count())
            .field("total_weight", self.state.total_weight())
            .field("history", &self.history.len())
            .field("hooks", &self.hooks.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl ChessGame {
    /// Create a game from a registry and starting placements
    ///
    /// Every placed id must be registered, every cell on the board, and no
    /// cell or id used twice. The random source is seeded from the OS; use
    /// [`ChessGame::with_seed`] for reproducible measurements.
    pub fn new(
        extent: BoardExtent,
        pieces: PieceRegistry,
        placements: impl IntoIterator<Item = (Cell, PieceId)>,
    ) -> GameResult<Self> {
        if extent.width == 0 || extent.height == 0 {
            return Err(GameError::setup("board extent must not be empty"));
        }

        let mut initial = ClassicBoardState::new();
        for (cell, id) in placements {
            if !extent.contains(cell) {
                return Err(GameError::setup(format!("{cell} is outside the board")));
            }
            if !pieces.contains(id) {
                return Err(GameError::setup(format!("piece {id} is not registered")));
            }
            if !initial.place(cell, id) {
                return Err(GameError::setup(format!("{cell} or piece {id} placed twice")));
            }
        }

        Ok(ChessGame {
            extent,
            pieces,
            state: QuantumBoardState::new(initial),
            history: MoveHistory::default(),
            rng: StdRng::from_os_rng(),
            hooks: Vec::new(),
            subscribers: Vec::new(),
        })
    }

    /// Replace the measurement random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn extent(&self) -> BoardExtent {
        self.extent
    }

    pub fn pieces(&self) -> &PieceRegistry {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&ClassicPiece> {
        self.pieces.get(id)
    }

    pub fn state(&self) -> &QuantumBoardState {
        &self.state
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Recompute the board meaning from the current state
    pub fn meaning(&self) -> BoardMeaning {
        BoardMeaning::from_state(&self.state, &self.pieces, self.extent)
    }

    /// The real piece `id` on `cell`, if it has any presence there
    pub fn real_piece(&self, id: PieceId, cell: Cell) -> Option<RealPiece> {
        let piece = *self.pieces.get(id)?;
        let weight = self.state.weight_at(id, cell);
        if weight.is_zero() {
            return None;
        }
        let total = self.state.total_weight();
        Some(RealPiece {
            piece,
            location: PieceLocation::Board(cell),
            presence: ratio(&weight, total),
            quantum: &weight != total,
        })
    }

    /// Current legal destinations of the real piece `id` on `origin`
    pub fn legal_destinations(&self, id: PieceId, origin: Cell) -> GameResult<BTreeSet<Cell>> {
        self.locate(id, origin)?;
        Ok(aggregate_destinations(&self.context(), id, origin, &self.state))
    }

    /// Dispatch on the number of targets: one is classic, two is quantum
    pub fn try_move(&mut self, id: PieceId, origin: Cell, targets: &[Cell]) -> GameResult<MoveEvent> {
        match targets {
            [target] => self.try_classic_move(id, origin, *target),
            [_, _] => self.try_quantum_move(id, origin, targets),
            _ => Err(self.reject(GameError::shape(format!(
                "expected one or two targets, got {}",
                targets.len()
            )))),
        }
    }

    pub fn try_classic_move(&mut self, id: PieceId, origin: Cell, target: Cell) -> GameResult<MoveEvent> {
        let mover = self.locate(id, origin).map_err(|e| self.reject(e))?;
        let legal = aggregate_destinations(&self.context(), id, origin, &self.state);
        if !legal.contains(&target) {
            return Err(self.reject(GameError::IllegalMove { piece: id, target }));
        }

        // Decided on exact weights: a rounded presence can read as 1
        let total = self.state.total_weight();
        let target_weights = self.state.weights_at(target);
        let mover_quantum = !self.state.is_certain_at(id, origin);
        let measures_origin = mover_quantum && target_weights.values().any(|w| w == total);
        let measures_target = !mover_quantum && !target_weights.is_empty();
        let is_castling = mover.piece.piece_type == PieceType::King
            && origin.y == target.y
            && origin.x.abs_diff(target.x) >= 2;

        let record = ClassicMove {
            player: mover.piece.player,
            piece_id: id,
            origin,
            target,
            measures_origin,
            measures_target,
            is_castling,
        };

        let mut next = self.state.clone();
        let ctx = RuleContext::new(&self.pieces, self.extent, self.history.last_move());
        let report = next.classic_move(&ctx, &record, &mut self.rng)?;
        Ok(self.commit(next, Move::Classic(record), report))
    }

    pub fn try_quantum_move(&mut self, id: PieceId, origin: Cell, targets: &[Cell]) -> GameResult<MoveEvent> {
        let &[first, second] = targets else {
            return Err(self.reject(GameError::shape(format!(
                "quantum moves need exactly two targets, got {}",
                targets.len()
            ))));
        };
        if first == second {
            return Err(self.reject(GameError::shape("quantum move targets must be distinct")));
        }

        let mover = self.locate(id, origin).map_err(|e| self.reject(e))?;
        if !mover.piece.piece_type.can_quantum_move() {
            return Err(self.reject(GameError::QuantumMoveForbidden {
                piece_type: mover.piece.piece_type,
            }));
        }

        let legal = aggregate_destinations(&self.context(), id, origin, &self.state);
        if let Some(&target) = targets.iter().find(|t| !legal.contains(*t)) {
            return Err(self.reject(GameError::IllegalMove { piece: id, target }));
        }

        let record = QuantumMove {
            player: mover.piece.player,
            piece_id: id,
            origin,
            targets: [first, second],
        };

        let mut next = self.state.clone();
        let ctx = RuleContext::new(&self.pieces, self.extent, self.history.last_move());
        let report = next.quantum_move(&ctx, &record)?;
        Ok(self.commit(next, Move::Quantum(record), report))
    }

    /// Register a hook fired synchronously after every committed move
    pub fn on_move(&mut self, hook: impl FnMut(&MoveEvent) + Send + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Channel receiving a copy of every committed move
    pub fn subscribe(&mut self) -> Receiver<MoveEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn context(&self) -> RuleContext<'_> {
        RuleContext::new(&self.pieces, self.extent, self.history.last_move())
    }

    fn locate(&self, id: PieceId, origin: Cell) -> GameResult<RealPiece> {
        self.real_piece(id, origin)
            .ok_or(GameError::PieceNotFound { piece: id, cell: origin })
    }

    fn reject(&self, err: GameError) -> GameError {
        warn!("[GAME] Move rejected: {}", err);
        err
    }

    fn commit(&mut self, next: QuantumBoardState, record: Move, report: MoveReport) -> MoveEvent {
        self.state = next;
        let event = MoveEvent {
            ply: self.history.len(),
            record,
            measurements: report.measurements,
        };
        self.history.add_move(record);

        info!(
            "[GAME] Ply {}: {} ({} branches, total weight {}, {} measurement(s))",
            event.ply,
            record,
            self.state.branch_count(),
            self.state.total_weight(),
            event.measurements.len()
        );

        for hook in &mut self.hooks {
            hook(&event);
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());

        event
    }
}

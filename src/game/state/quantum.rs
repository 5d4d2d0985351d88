//! The weighted collection of classical branches
//!
//! [`QuantumBoardState`] exclusively owns its branch list. Every mutation
//! ends with [`QuantumBoardState::consolidate`], which restores the
//! invariants:
//!
//! - the collection is non-empty and the total weight is positive
//! - no two branches have identical occupancy
//! - branch weights share no common divisor above one, unless some branch
//!   already has weight one (no further reduction is attempted then)
//!
//! Measurement is the only source of randomness and always takes the random
//! source as an argument.

use super::weight::{self, normalization_divisor, uniform_below};
use super::ClassicBoardState;
use crate::game::error::{GameError, GameResult};
use crate::game::moves::{ClassicMove, MeasurementOutcome, QuantumMove};
use crate::game::pieces::PieceId;
use crate::game::rules::RuleContext;
use crate::game::types::Cell;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, error};

/// What a consolidation pass did
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsolidationReport {
    /// Branches folded into an identical earlier branch
    pub merged: usize,
    /// Common factor all weights were divided by (one when none was applied)
    pub divisor: BigUint,
}

/// Result of applying one move to the quantum state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    /// Measurements performed before the move, in order
    pub measurements: Vec<MeasurementOutcome>,
    /// Branch images in which the move actually took effect
    pub applied: usize,
    pub consolidation: ConsolidationReport,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantumBoardState {
    branches: Vec<ClassicBoardState>,
    total_weight: BigUint,
}

impl QuantumBoardState {
    /// Quantum state holding a single root branch
    pub fn new(initial: ClassicBoardState) -> Self {
        let total_weight = initial.weight().clone();
        QuantumBoardState {
            branches: vec![initial],
            total_weight,
        }
    }

    /// Build a quantum state from arbitrary branches, consolidating them
    pub fn from_branches(branches: Vec<ClassicBoardState>) -> GameResult<Self> {
        let mut state = QuantumBoardState {
            branches,
            total_weight: BigUint::zero(),
        };
        state.consolidate()?;
        Ok(state)
    }

    pub fn branches(&self) -> &[ClassicBoardState] {
        &self.branches
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    pub fn total_weight(&self) -> &BigUint {
        &self.total_weight
    }

    /// Every piece id that stands on `cell` in at least one branch
    pub fn occupants_at(&self, cell: Cell) -> BTreeSet<PieceId> {
        self.branches
            .iter()
            .filter_map(|branch| branch.piece_at(cell))
            .collect()
    }

    pub fn is_cell_empty(&self, cell: Cell) -> bool {
        self.branches.iter().all(|branch| branch.is_empty(cell))
    }

    /// Summed weight of the branches placing each piece id on `cell`
    pub fn weights_at(&self, cell: Cell) -> BTreeMap<PieceId, BigUint> {
        let mut appearances: BTreeMap<PieceId, BigUint> = BTreeMap::new();
        for branch in &self.branches {
            if let Some(id) = branch.piece_at(cell) {
                *appearances.entry(id).or_default() += branch.weight();
            }
        }
        appearances
    }

    /// Summed weight of the branches placing `id` on `cell`
    pub fn weight_at(&self, id: PieceId, cell: Cell) -> BigUint {
        self.branches
            .iter()
            .filter(|branch| branch.piece_at(cell) == Some(id))
            .map(|branch| branch.weight())
            .sum()
    }

    /// Whether `id` stands on `cell` in every branch
    ///
    /// Exact, unlike comparing [`QuantumBoardState::presence_at`] with one.
    pub fn is_certain_at(&self, id: PieceId, cell: Cell) -> bool {
        !self.total_weight.is_zero() && self.weight_at(id, cell) == self.total_weight
    }

    /// Probability of finding `id` on `cell`, for display
    pub fn presence_at(&self, id: PieceId, cell: Cell) -> f64 {
        weight::ratio(&self.weight_at(id, cell), &self.total_weight)
    }

    /// Probability that `id` has been captured
    pub fn captured_presence(&self, id: PieceId) -> f64 {
        let weight: BigUint = self
            .branches
            .iter()
            .filter(|branch| branch.is_captured(id))
            .map(|branch| branch.weight())
            .sum();
        weight::ratio(&weight, &self.total_weight)
    }

    /// Apply a classic move to every branch
    ///
    /// Measurements run first (origin before target), then the move is
    /// applied to each surviving branch independently. Branches in which the
    /// move is illegal are left unchanged.
    pub fn classic_move<R: Rng>(
        &mut self,
        ctx: &RuleContext<'_>,
        mv: &ClassicMove,
        rng: &mut R,
    ) -> GameResult<MoveReport> {
        let mut measurements = Vec::new();
        if mv.measures_origin {
            measurements.push(self.measure(mv.origin, rng)?);
        }
        if mv.measures_target {
            measurements.push(self.measure(mv.target, rng)?);
        }

        let applied = self
            .branches
            .iter_mut()
            .map(|branch| branch.apply_move_if_legal(ctx, mv.piece_id, mv.origin, mv.target))
            .filter(|&moved| moved)
            .count();

        let consolidation = self.consolidate()?;
        debug!(
            "[QUANTUM] Classic move {} {}->{} applied in {} branches; {} branches remain (total weight {})",
            mv.piece_id,
            mv.origin,
            mv.target,
            applied,
            self.branches.len(),
            self.total_weight
        );

        Ok(MoveReport {
            measurements,
            applied,
            consolidation,
        })
    }

    /// Apply a quantum move: split every branch and consolidate
    pub fn quantum_move(&mut self, ctx: &RuleContext<'_>, mv: &QuantumMove) -> GameResult<MoveReport> {
        if mv.targets[0] == mv.targets[1] {
            return Err(GameError::shape("quantum move targets must be distinct"));
        }

        let (split, applied) = self.split_with_count(ctx, mv);
        self.branches = split;
        let consolidation = self.consolidate()?;
        debug!(
            "[QUANTUM] Quantum move {} {}->{{{}, {}}}: {} branches after merging {} (total weight {})",
            mv.piece_id,
            mv.origin,
            mv.targets[0],
            mv.targets[1],
            self.branches.len(),
            consolidation.merged,
            self.total_weight
        );

        Ok(MoveReport {
            measurements: Vec::new(),
            applied,
            consolidation,
        })
    }

    /// The unconsolidated branch list a quantum move produces
    ///
    /// Every branch yields two images carrying the parent's weight: the first
    /// moved to `targets[0]`, the second to `targets[1]`. Originals come
    /// first, followed by the clones in the same order.
    pub fn split_branches(&self, ctx: &RuleContext<'_>, mv: &QuantumMove) -> Vec<ClassicBoardState> {
        self.split_with_count(ctx, mv).0
    }

    fn split_with_count(&self, ctx: &RuleContext<'_>, mv: &QuantumMove) -> (Vec<ClassicBoardState>, usize) {
        let mut originals = Vec::with_capacity(self.branches.len() * 2);
        let mut clones = Vec::with_capacity(self.branches.len());
        let mut applied = 0;

        for branch in &self.branches {
            let mut first = branch.clone();
            let mut second = branch.clone();
            applied += first.apply_move_if_legal(ctx, mv.piece_id, mv.origin, mv.targets[0]) as usize;
            applied += second.apply_move_if_legal(ctx, mv.piece_id, mv.origin, mv.targets[1]) as usize;
            originals.push(first);
            clones.push(second);
        }

        originals.extend(clones);
        (originals, applied)
    }

    /// Merge identical branches, normalize weights and recompute the total
    ///
    /// The first occurrence of each occupancy keeps its position, capture
    /// list and moved set; later duplicates only contribute their weight.
    pub fn consolidate(&mut self) -> GameResult<ConsolidationReport> {
        let mut merged = 0;
        let mut seen: HashMap<BTreeMap<Cell, PieceId>, usize> = HashMap::with_capacity(self.branches.len());
        let mut kept: Vec<ClassicBoardState> = Vec::with_capacity(self.branches.len());

        for branch in self.branches.drain(..) {
            if branch.weight().is_zero() {
                error!("[QUANTUM] Branch with zero weight found during consolidation");
                return Err(GameError::invariant("branch with zero weight"));
            }
            match seen.get(branch.occupancy()) {
                Some(&index) => {
                    let weight = kept[index].weight() + branch.weight();
                    kept[index].set_weight(weight);
                    merged += 1;
                }
                None => {
                    seen.insert(branch.occupancy().clone(), kept.len());
                    kept.push(branch);
                }
            }
        }

        if kept.is_empty() {
            error!("[QUANTUM] Consolidation produced an empty branch set");
            return Err(GameError::invariant("no branches left"));
        }

        let divisor = {
            let weights: Vec<&BigUint> = kept.iter().map(|b| b.weight()).collect();
            normalization_divisor(&weights)
        };
        if !divisor.is_one() {
            for branch in &mut kept {
                let weight = branch.weight() / &divisor;
                branch.set_weight(weight);
            }
        }

        self.total_weight = kept.iter().map(|b| b.weight()).sum();
        self.branches = kept;

        Ok(ConsolidationReport { merged, divisor })
    }

    /// Collapse `cell` to a single occupant
    ///
    /// Samples one branch with probability proportional to its weight, reads
    /// its occupant of `cell`, and discards every branch that disagrees.
    pub fn measure<R: Rng>(&mut self, cell: Cell, rng: &mut R) -> GameResult<MeasurementOutcome> {
        if self.branches.is_empty() || self.total_weight.is_zero() {
            error!("[QUANTUM] Measurement of {} with no sampleable branch", cell);
            return Err(GameError::invariant("measurement on an empty quantum state"));
        }

        let draw = uniform_below(&self.total_weight, rng);
        let mut cumulative = BigUint::zero();
        let mut sampled = None;
        for branch in &self.branches {
            cumulative += branch.weight();
            if draw < cumulative {
                sampled = Some(branch.piece_at(cell));
                break;
            }
        }
        let Some(occupant) = sampled else {
            error!("[QUANTUM] Cumulative weight scan of {} ended without a sample", cell);
            return Err(GameError::invariant("branch weights do not add up to the total"));
        };

        let before = self.branches.len();
        self.branches.retain(|branch| branch.piece_at(cell) == occupant);
        let discarded = before - self.branches.len();
        self.total_weight = self.branches.iter().map(|b| b.weight()).sum();

        debug!(
            "[QUANTUM] Measured {}: occupant {:?}, discarded {} of {} branches",
            cell, occupant, discarded, before
        );

        Ok(MeasurementOutcome {
            cell,
            occupant,
            discarded,
        })
    }
}

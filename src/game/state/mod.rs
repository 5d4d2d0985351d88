//! Board state layers
//!
//! - `classic` - one fully determined branch
//! - `quantum` - the weighted branch collection, consolidation and measurement
//! - `meaning` - the derived per-cell presence projection
//! - `weight` - arbitrary-precision weight helpers

pub mod classic;
pub mod meaning;
pub mod quantum;
pub mod weight;

pub use classic::ClassicBoardState;
pub use meaning::{BoardMeaning, PieceLocation, RealPiece};
pub use quantum::{ConsolidationReport, MoveReport, QuantumBoardState};

// Alpha-beta core: root search, principal-variation search, quiescence,
// check evasions and the transposition cache they share.
pub mod alphabeta;
pub mod eval;
mod in_check;
pub mod params;
pub mod position;
pub mod pv;
mod quiescence;
pub mod stop;
pub mod tt;

pub use alphabeta::{SearchResult, SearchStats, Searcher};
pub use eval::{Evaluator, Score, DRAW_SCORE, MATE_SCORE, MAX_PLY};
pub use params::{ParamsError, SearchParams};
pub use position::{MoveHints, MoveList, Position};
pub use stop::StopSignal;
pub use tt::{Bound, Tt};

/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


mod diff;
mod file_state;
mod state_handler;

pub use diff::{diff, Key, Path, StateChange, StateDiff};
pub use file_state::{FileState, DEFAULT_STATE_PATH};
pub use state_handler::StateHandler;

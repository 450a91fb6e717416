//! Plain data types shared by the environments and the agents.
//!
//! - [`Grid`], [`Cell`], [`Coord`], [`PlayerNum`] - the tic-tac-toe playing surface
//! - [`StateIndex`] - dense base-3 encoding of a grid, used as a value-table key

pub use self::{grid::*, state_index::*};

pub(crate) mod grid;
pub(crate) mod state_index;

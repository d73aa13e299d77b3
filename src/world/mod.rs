// world/ - Scene-space queries
//
// Pure functions to size the tree and project it onto the screen.
// Sizes come from the canvas only; nothing here holds state.

mod metrics;
mod projection;

pub use metrics::*;
pub use projection::*;

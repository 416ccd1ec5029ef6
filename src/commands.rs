mod diff;
mod hash;
mod mask;
mod matching;

pub use diff::run_diff;
pub use hash::run_hash;
pub use mask::run_mask;
pub use matching::{run_match, MatchArgs};

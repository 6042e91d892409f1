pub mod draw;
pub mod params;
pub mod permutations;
pub mod runner;

pub use self::draw::{draw_domain, optimal_draw, DrawOptimum, DrawStrategy, DrawWindow};
pub use self::params::{SearchParams, MAX_SLOTS};
pub use self::permutations::{ModuleCountTuple, Partition, PermutationSpace};
pub use self::runner::{ProgressCallback, SearchOptions, SearchOutcome, ShellSearch, Silent};

pub mod patterns;
pub mod scan;

pub use patterns::{CompiledPattern, compile_patterns, load_patterns};
pub use scan::{MatchCounts, scan_tree};

pub mod deliver;
pub mod model;
pub mod render;

pub use deliver::deliver_verdict;
pub use model::{TaskResult, Verdict, VerdictStatus};

mod guess;
pub use guess::*;

mod stats;
pub use stats::*;

pub use hints::*;
pub use prediction::*;

mod hints;
mod prediction;

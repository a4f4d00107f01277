pub mod aggregator;
pub mod helpers;
pub mod sentence;
pub mod stream;

pub use aggregator::*;
pub use helpers::*;
pub use sentence::*;
pub use stream::*;

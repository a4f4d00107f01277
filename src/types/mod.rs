pub mod event;
pub mod fix;
pub mod nmea;

pub use event::*;
pub use fix::*;
pub use nmea::*;

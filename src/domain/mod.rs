pub mod battery;
pub mod forecast;
pub mod schedule;
pub mod types;

pub use battery::*;
pub use forecast::*;
pub use schedule::*;
pub use types::*;

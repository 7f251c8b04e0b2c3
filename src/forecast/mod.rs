pub mod engine;
pub mod estimators;
pub mod features;
#[cfg(feature = "ml")]
pub mod learners;
pub mod metrics;
pub mod weather;

pub use engine::*;
pub use estimators::*;
pub use features::*;
#[cfg(feature = "ml")]
pub use learners::{fit_learners, Learner, LearnerKind};
pub use metrics::*;
pub use weather::*;

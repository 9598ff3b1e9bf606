pub mod estimator;
#[cfg(feature = "sim")]
pub mod noise;
pub mod recommend;
pub mod usage;

pub use estimator::*;
#[cfg(feature = "sim")]
pub use noise::*;
pub use recommend::*;
pub use usage::*;

pub mod device;
pub mod prediction;
pub mod tariff;
pub mod types;

pub use device::*;
pub use prediction::*;
pub use tariff::*;
pub use types::*;

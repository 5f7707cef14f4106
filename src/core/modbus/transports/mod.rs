pub mod emulated;
pub mod rtu;

pub use emulated::*;
pub use rtu::*;

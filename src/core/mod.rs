pub mod arm;
pub mod clamper;
pub mod connection;
pub mod modbus;
pub mod registers;
pub mod settings;

pub use arm::*;
pub use clamper::*;
pub use connection::*;
pub use modbus::*;
pub use settings::*;

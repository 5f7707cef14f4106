use super::{Error, ReadFunction, WriteFunction, Value};

/// A single exclusively-owned Modbus session. Every call is one blocking
/// request/response exchange with the arm.
pub trait Transport {
    fn read(&mut self, function: &ReadFunction) -> Result<Vec<Value>, Error>;
    fn write(&mut self, function: &WriteFunction) -> Result<(), Error>;

    /// Releases the session. Requests issued afterwards fail with
    /// [`Fault::NotConnected`](super::Fault::NotConnected).
    fn close(&mut self) -> Result<(), Error>;
}

use std::fmt::{Display, Formatter};
use std::io;

enum_from_primitive! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Modbus exception codes returned from the arm.
    pub enum ExceptionCode {
        IllegalFunction         = 0x01,
        IllegalDataAddress      = 0x02,
        IllegalDataValue        = 0x03,
        SlaveOrServerFailure    = 0x04,
        Acknowledge             = 0x05,
        SlaveOrServerBusy       = 0x06,
        NegativeAcknowledge     = 0x07,
        MemoryParity            = 0x08,
        NotDefined              = 0x09,
        GatewayPath             = 0x0a,
        GatewayTarget           = 0x0b
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    EmptyDevicePath,
    InvalidBaudRate(u32),
    InvalidParity(char),
    InvalidDataBits(u8),
    InvalidStopBits(u8),
    InvalidSlaveId(u8),
    UnexpectedReplySize { expected: usize, received: usize },
    Custom(String),
}

/// The cause of a failed request/response exchange, as reported by the transport.
#[derive(Debug)]
pub enum Fault {
    Io(io::Error),
    Exception(ExceptionCode),
    InvalidData(Reason),
    NotConnected,
}

#[derive(Debug)]
pub enum Error {
    /// The connection parameters cannot describe a serial transport.
    TransportInit(Reason),
    /// The serial session could not be opened.
    Connection(io::Error),
    /// A read or write round-trip failed.
    Io(Fault),
}

impl From<Reason> for Fault {
    fn from(reason: Reason) -> Fault {
        Fault::InvalidData(reason)
    }
}

impl From<Fault> for Error {
    fn from(fault: Fault) -> Error {
        Error::Io(fault)
    }
}

impl From<ExceptionCode> for Error {
    fn from(err: ExceptionCode) -> Error {
        Error::Io(Fault::Exception(err))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(Fault::Io(err))
    }
}

impl Display for Reason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::EmptyDevicePath => write!(f, "device path is empty"),
            Reason::InvalidBaudRate(baud) => write!(f, "invalid baud rate {baud}"),
            Reason::InvalidParity(parity) => write!(f, "invalid parity '{parity}'"),
            Reason::InvalidDataBits(bits) => write!(f, "invalid data bits {bits}"),
            Reason::InvalidStopBits(bits) => write!(f, "invalid stop bits {bits}"),
            Reason::InvalidSlaveId(id) => write!(f, "invalid slave id {id}"),
            Reason::UnexpectedReplySize { expected, received } => write!(
                f,
                "expected {expected} registers in reply, received {received}"
            ),
            Reason::Custom(reason) => write!(f, "{reason}"),
        }
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Fault::Io(err) => write!(f, "{err}"),
            Fault::Exception(code) => write!(f, "modbus exception {code:?}"),
            Fault::InvalidData(reason) => write!(f, "invalid data: {reason}"),
            Fault::NotConnected => write!(f, "not connected"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TransportInit(reason) => write!(f, "cannot create transport: {reason}"),
            Error::Connection(err) => write!(f, "connection failed: {err}"),
            Error::Io(fault) => write!(f, "modbus request failed: {fault}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection(err) | Error::Io(Fault::Io(err)) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use enum_primitive::FromPrimitive;

    use super::*;

    #[test]
    fn decodes_exception_bytes() {
        assert_eq!(
            ExceptionCode::from_u8(0x02),
            Some(ExceptionCode::IllegalDataAddress)
        );
        assert_eq!(
            ExceptionCode::from_u8(0x0b),
            Some(ExceptionCode::GatewayTarget)
        );
        assert_eq!(ExceptionCode::from_u8(0x0c), None);
        assert_eq!(ExceptionCode::from_u8(0x00), None);
    }

    #[test]
    fn io_errors_surface_as_io_faults() {
        let error: Error = io::Error::new(io::ErrorKind::TimedOut, "no reply").into();
        assert!(matches!(error, Error::Io(Fault::Io(ref e)) if e.kind() == io::ErrorKind::TimedOut));
        assert!(std::error::Error::source(&error).is_some());

        let error: Error = ExceptionCode::SlaveOrServerBusy.into();
        assert!(matches!(
            error,
            Error::Io(Fault::Exception(ExceptionCode::SlaveOrServerBusy))
        ));
    }

    #[test]
    fn display_names_the_failure() {
        let error = Error::TransportInit(Reason::InvalidDataBits(9));
        assert_eq!(error.to_string(), "cannot create transport: invalid data bits 9");

        let error = Error::Io(Fault::NotConnected);
        assert_eq!(error.to_string(), "modbus request failed: not connected");
    }
}

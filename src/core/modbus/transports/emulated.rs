use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace};

use crate::core::modbus::{
    Address, Error, ExceptionCode, Fault, ReadFunction, Transport, Value, WriteFunction,
};
use crate::core::registers::{HOLDING_REGISTER_COUNT, INPUT_REGISTER_COUNT};
use crate::core::{Connect, Yj10Settings};

/// The register file of an emulated arm.
#[derive(Debug)]
struct EmulatedDevice {
    input: [Value; INPUT_REGISTER_COUNT],
    holding: [Value; HOLDING_REGISTER_COUNT],

    requests: usize,
    sessions: usize,
    refuse_connections: bool,
    failing: bool,
}

impl Default for EmulatedDevice {
    fn default() -> Self {
        EmulatedDevice {
            input: [0; INPUT_REGISTER_COUNT],
            holding: [0; HOLDING_REGISTER_COUNT],
            requests: 0,
            sessions: 0,
            refuse_connections: false,
            failing: false,
        }
    }
}

impl EmulatedDevice {
    fn range(addr: Address, quantity: usize, len: usize) -> Result<std::ops::Range<usize>, Error> {
        let start = addr as usize;
        let end = start + quantity;

        if quantity == 0 || end > len {
            return Err(ExceptionCode::IllegalDataAddress.into());
        }

        Ok(start..end)
    }

    fn read(&mut self, function: &ReadFunction) -> Result<Vec<Value>, Error> {
        self.requests += 1;
        if self.failing {
            return Err(emulated_failure());
        }

        let quantity = function.quantity() as usize;
        match *function {
            ReadFunction::InputRegisters(addr, _) => {
                let range = Self::range(addr, quantity, INPUT_REGISTER_COUNT)?;
                Ok(self.input[range].to_vec())
            }
            ReadFunction::HoldingRegisters(addr, _) => {
                let range = Self::range(addr, quantity, HOLDING_REGISTER_COUNT)?;
                Ok(self.holding[range].to_vec())
            }
        }
    }

    fn write(&mut self, function: &WriteFunction) -> Result<(), Error> {
        self.requests += 1;
        if self.failing {
            return Err(emulated_failure());
        }

        match *function {
            WriteFunction::SingleRegister(addr, value) => {
                let range = Self::range(addr, 1, HOLDING_REGISTER_COUNT)?;
                self.holding[range.start] = value;
            }
            WriteFunction::MultipleRegisters(addr, values) => {
                let range = Self::range(addr, values.len(), HOLDING_REGISTER_COUNT)?;
                self.holding[range].copy_from_slice(values);
            }
        }

        Ok(())
    }
}

fn emulated_failure() -> Error {
    io::Error::new(io::ErrorKind::TimedOut, "emulated arm did not answer").into()
}

/// Connector for an in-memory arm, used to run tests and demos without a
/// device present.
///
/// Clones share the same register file, so a test can keep one handle to
/// inspect and steer the device while the driver owns the session.
///
/// ```
/// use yj10::prelude::*;
///
/// let emulated = Emulated::new();
/// let mut arm = Yj10Arm::with_connector(Yj10Settings::new("emulated"), emulated.clone())
///     .expect("Must create");
///
/// arm.connect().expect("Must connect");
/// arm.write_joint(2, 1500).expect("Must write");
/// assert_eq!(emulated.holding_register(2), 1500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Emulated {
    device: Arc<Mutex<EmulatedDevice>>,
}

impl Emulated {
    pub fn new() -> Emulated {
        Emulated::default()
    }

    fn device(&self) -> MutexGuard<'_, EmulatedDevice> {
        self.device.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets a holding register as the arm itself would, e.g. the clamper state.
    pub fn set_holding_register(&self, addr: Address, value: Value) {
        if let Some(slot) = self.device().holding.get_mut(addr as usize) {
            *slot = value;
        }
    }

    pub fn set_input_register(&self, addr: Address, value: Value) {
        if let Some(slot) = self.device().input.get_mut(addr as usize) {
            *slot = value;
        }
    }

    pub fn holding_register(&self, addr: Address) -> Value {
        self.device().holding.get(addr as usize).copied().unwrap_or(0)
    }

    pub fn holding_registers(&self) -> [Value; HOLDING_REGISTER_COUNT] {
        self.device().holding
    }

    /// Number of requests that reached the device, failed ones included.
    pub fn requests(&self) -> usize {
        self.device().requests
    }

    /// Number of sessions currently open against the device.
    pub fn sessions(&self) -> usize {
        self.device().sessions
    }

    /// While set, every request fails with a timeout.
    pub fn set_failing(&self, failing: bool) {
        self.device().failing = failing;
    }

    /// While set, opening a session fails as if the port were absent.
    pub fn set_refuse_connections(&self, refuse: bool) {
        self.device().refuse_connections = refuse;
    }
}

pub struct EmulatedTransport {
    device: Arc<Mutex<EmulatedDevice>>,
    open: bool,
}

impl EmulatedTransport {
    fn device(&self) -> Result<MutexGuard<'_, EmulatedDevice>, Error> {
        if !self.open {
            return Err(Error::Io(Fault::NotConnected));
        }

        Ok(self.device.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Transport for EmulatedTransport {
    fn read(&mut self, function: &ReadFunction) -> Result<Vec<Value>, Error> {
        trace!(
            "Emulated read fn=0x{:02x} addr=0x{:02x} quant={}",
            function.code(),
            function.address(),
            function.quantity()
        );
        self.device()?.read(function)
    }

    fn write(&mut self, function: &WriteFunction) -> Result<(), Error> {
        trace!(
            "Emulated write fn=0x{:02x} addr=0x{:02x}",
            function.code(),
            function.address()
        );
        self.device()?.write(function)
    }

    fn close(&mut self) -> Result<(), Error> {
        if self.open {
            self.open = false;
            let mut device = self.device.lock().unwrap_or_else(PoisonError::into_inner);
            device.sessions = device.sessions.saturating_sub(1);
            debug!("Emulated session closed");
        }
        Ok(())
    }
}

impl Connect for Emulated {
    type Transport = EmulatedTransport;

    fn connect(&self, settings: &Yj10Settings) -> Result<Self::Transport, Error> {
        let mut device = self.device();
        if device.refuse_connections {
            return Err(Error::Connection(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no emulated arm at {}", settings.device),
            )));
        }

        device.sessions += 1;
        debug!("Emulated session opened on {settings}");

        Ok(EmulatedTransport {
            device: Arc::clone(&self.device),
            open: true,
        })
    }
}

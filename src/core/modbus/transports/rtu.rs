use enum_primitive::FromPrimitive;
use log::{debug, trace};
use tokio_modbus::client::sync::{rtu, Context};
use tokio_modbus::prelude::{SyncReader, SyncWriter};
use tokio_modbus::Slave;
use tokio_serial::{DataBits, FlowControl, SerialPortBuilder, StopBits};

use crate::core::modbus::{
    Error, ExceptionCode, Fault, ReadFunction, Reason, Transport, Value, WriteFunction,
};
use crate::core::{Connect, Parity, Yj10Settings};

/// A Modbus RTU session over a serial port.
///
/// Framing, CRC and the serial line itself are handled by `tokio-modbus`; this
/// transport only forwards requests and translates the replies into [`Fault`]s.
pub struct RtuTransport {
    context: Option<Context>,
}

impl RtuTransport {
    fn context(&mut self) -> Result<&mut Context, Error> {
        self.context.as_mut().ok_or(Error::Io(Fault::NotConnected))
    }
}

impl Transport for RtuTransport {
    fn read(&mut self, function: &ReadFunction) -> Result<Vec<Value>, Error> {
        trace!(
            "RTU read fn=0x{:02x} addr=0x{:02x} quant={}",
            function.code(),
            function.address(),
            function.quantity()
        );

        let context = self.context()?;
        let reply = match *function {
            ReadFunction::InputRegisters(addr, quant) => context.read_input_registers(addr, quant),
            ReadFunction::HoldingRegisters(addr, quant) => {
                context.read_holding_registers(addr, quant)
            }
        };

        settle(reply)
    }

    fn write(&mut self, function: &WriteFunction) -> Result<(), Error> {
        trace!(
            "RTU write fn=0x{:02x} addr=0x{:02x}",
            function.code(),
            function.address()
        );

        let context = self.context()?;
        let reply = match *function {
            WriteFunction::SingleRegister(addr, value) => context.write_single_register(addr, value),
            WriteFunction::MultipleRegisters(addr, values) => {
                context.write_multiple_registers(addr, values)
            }
        };

        settle(reply)
    }

    fn close(&mut self) -> Result<(), Error> {
        // Dropping the context releases the serial port.
        if self.context.take().is_some() {
            debug!("RTU session closed");
        }
        Ok(())
    }
}

fn settle<T>(reply: tokio_modbus::Result<T>) -> Result<T, Error> {
    match reply {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(code)) => {
            let raw = u8::from(code);
            match ExceptionCode::from_u8(raw) {
                Some(code) => Err(code.into()),
                None => Err(Fault::from(Reason::Custom(format!(
                    "unknown exception code 0x{raw:02x}"
                )))
                .into()),
            }
        }
        Err(tokio_modbus::Error::Transport(err)) => Err(Fault::Io(err).into()),
        Err(err) => Err(Fault::from(Reason::Custom(err.to_string())).into()),
    }
}

/// The serial Modbus RTU connector.
///
/// ```no_run
/// use yj10::prelude::*;
///
/// let mut arm = Yj10Arm::new(Yj10Settings::new("/dev/ttyUSB0")).expect("Must create");
/// arm.connect().expect("Must connect");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Rtu;

impl Rtu {
    /// Describes the serial port for the given settings without opening it.
    ///
    /// The line format is checked while it is converted; the remaining
    /// parameters go through [`Yj10Settings::validate`].
    pub fn forge(settings: &Yj10Settings) -> Result<SerialPortBuilder, Error> {
        let parity = match settings.parity {
            Parity::None => tokio_serial::Parity::None,
            Parity::Even => tokio_serial::Parity::Even,
            Parity::Odd => tokio_serial::Parity::Odd,
        };

        let data_bits = match settings.data_bits {
            5 => DataBits::Five,
            6 => DataBits::Six,
            7 => DataBits::Seven,
            8 => DataBits::Eight,
            bits => return Err(Error::TransportInit(Reason::InvalidDataBits(bits))),
        };

        let stop_bits = match settings.stop_bits {
            1 => StopBits::One,
            2 => StopBits::Two,
            bits => return Err(Error::TransportInit(Reason::InvalidStopBits(bits))),
        };

        settings.validate()?;

        Ok(tokio_serial::new(settings.device.as_str(), settings.baud_rate)
            .parity(parity)
            .data_bits(data_bits)
            .stop_bits(stop_bits)
            .flow_control(FlowControl::None))
    }
}

impl Connect for Rtu {
    type Transport = RtuTransport;

    fn connect(&self, settings: &Yj10Settings) -> Result<Self::Transport, Error> {
        let builder = Rtu::forge(settings)?;
        let context =
            rtu::connect_slave_with_timeout(&builder, Slave(settings.slave), settings.timeout)
                .map_err(Error::Connection)?;

        debug!("RTU session opened on {settings}");
        Ok(RtuTransport {
            context: Some(context),
        })
    }
}

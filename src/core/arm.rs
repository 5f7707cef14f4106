use std::borrow::Borrow;

use log::{debug, warn};

use crate::core::modbus::{Address, Client, Error, Fault, Quantity, Transport, Value};
use crate::core::registers::*;
use crate::core::{ClamperInstruction, ClamperState, Connect, Rtu, Yj10Settings};

/// A YJ10 arm reached over Modbus.
///
/// The arm keeps two local register caches: the input registers
/// (calibration constants) and the holding registers (joint PWM values and
/// clamper state). `read_*` methods refresh a cache from the arm; accessors
/// such as [`Yj10Arm::joint`] and [`Yj10Arm::clamper`] only look at the cache.
/// Writes go straight to the arm and leave the cache untouched until the
/// next read.
///
/// ```
/// use yj10::prelude::*;
///
/// let emulated = Emulated::new();
/// let mut arm = Yj10Arm::with_connector(Yj10Settings::new("emulated"), emulated)
///     .expect("Must create");
///
/// arm.connect().expect("Must connect");
/// arm.write_all_joints([1500, 1500, 1200, 900, 1500]).expect("Must write");
/// arm.read_all_joints_pwm().expect("Must read");
///
/// assert_eq!(arm.joints(), [1500, 1500, 1200, 900, 1500]);
/// arm.close();
/// ```
///
/// A single arm performs one blocking exchange at a time; callers sharing it
/// between threads must serialise access themselves.
pub struct Yj10Arm<C = Rtu>
where
    C: Connect,
{
    settings: Yj10Settings,
    connector: C,
    transport: Option<C::Transport>,

    input_regs: [Value; INPUT_REGISTER_COUNT],
    holding_regs: [Value; HOLDING_REGISTER_COUNT],
}

impl Yj10Arm<Rtu> {
    /// Creates an arm reached over a serial Modbus RTU line. The port is not
    /// opened until [`Yj10Arm::connect`].
    pub fn new(settings: Yj10Settings) -> Result<Yj10Arm<Rtu>, Error> {
        Rtu::forge(&settings)?;
        Yj10Arm::with_connector(settings, Rtu)
    }
}

impl<C> Yj10Arm<C>
where
    C: Connect,
{
    pub fn with_connector(settings: Yj10Settings, connector: C) -> Result<Yj10Arm<C>, Error> {
        settings.validate()?;

        Ok(Yj10Arm {
            settings,
            connector,
            transport: None,
            input_regs: [0; INPUT_REGISTER_COUNT],
            holding_regs: [0; HOLDING_REGISTER_COUNT],
        })
    }

    pub fn settings(&self) -> &Yj10Settings {
        &self.settings
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Opens the session. An already open session is closed and replaced.
    pub fn connect(&mut self) -> Result<(), Error> {
        self.close();

        let transport = self.connector.connect(&self.settings).map_err(|err| {
            warn!("Failed to connect to {}: {}", self.settings, err);
            err
        })?;

        debug!("Connected to {}", self.settings);
        self.transport = Some(transport);
        Ok(())
    }

    /// Releases the session. Safe to call at any time, including before
    /// [`Yj10Arm::connect`] or more than once.
    pub fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            match transport.close() {
                Ok(()) => debug!("Closed connection to {}", self.settings),
                Err(err) => warn!("Error closing connection to {}: {}", self.settings, err),
            }
        }
    }

    fn transport(&mut self) -> Result<&mut C::Transport, Error> {
        self.transport.as_mut().ok_or(Error::Io(Fault::NotConnected))
    }

    fn read_input_registers(&mut self, addr: Address, quant: Quantity) -> Result<(), Error> {
        let values = self.transport()?.read_input_registers(addr, quant).map_err(|err| {
            warn!("Reading input registers 0x{addr:02x}+{quant} failed: {err}");
            err
        })?;

        let start = addr as usize;
        self.input_regs[start..start + values.len()].copy_from_slice(&values);
        Ok(())
    }

    fn read_holding_registers(&mut self, addr: Address, quant: Quantity) -> Result<(), Error> {
        let values = self.transport()?.read_holding_registers(addr, quant).map_err(|err| {
            warn!("Reading holding registers 0x{addr:02x}+{quant} failed: {err}");
            err
        })?;

        let start = addr as usize;
        self.holding_regs[start..start + values.len()].copy_from_slice(&values);
        Ok(())
    }

    fn write_holding_register(&mut self, addr: Address, value: Value) -> Result<(), Error> {
        self.transport()?.write_register(addr, value).map_err(|err| {
            warn!("Writing holding register 0x{addr:02x} failed: {err}");
            err
        })
    }

    fn write_holding_registers(&mut self, addr: Address, values: &[Value]) -> Result<(), Error> {
        self.transport()?.write_registers(addr, values).map_err(|err| {
            warn!("Writing holding registers 0x{addr:02x}+{} failed: {err}", values.len());
            err
        })
    }

    /// Reads every input register: joint PWM limits, maximum clamper current
    /// and other constants. These do not change, so one read is enough.
    pub fn read_all_input_regs(&mut self) -> Result<(), Error> {
        self.read_input_registers(0x00, INPUT_REGISTER_COUNT as Quantity)
    }

    /// Reads every holding register: joint PWM values and the clamper
    /// instruction, state and current.
    pub fn read_all_holding_regs(&mut self) -> Result<(), Error> {
        self.read_holding_registers(0x00, HOLDING_REGISTER_COUNT as Quantity)
    }

    /// Reads the joint PWM values only.
    pub fn read_all_joints_pwm(&mut self) -> Result<(), Error> {
        self.read_holding_registers(JOINT_PWM_BASE, JOINT_COUNT as Quantity)
    }

    /// Reads the clamper registers only, leaving the joints untouched.
    pub fn read_clamper(&mut self) -> Result<(), Error> {
        self.read_holding_registers(CLAMPER_BLOCK_BASE, CLAMPER_BLOCK_LENGTH)
    }

    /// Commands a joint PWM value. Indices above [`MAX_JOINT_INDEX`] are
    /// ignored without contacting the arm. The value is sent as given; see
    /// [`pwm_in_range`] for the range the arm accepts.
    pub fn write_joint(&mut self, index: usize, pwm: Value) -> Result<(), Error> {
        if index > MAX_JOINT_INDEX {
            debug!("Ignoring write to joint {index}");
            return Ok(());
        }

        self.write_holding_register(JOINT_PWM_BASE + index as Address, pwm)
    }

    /// Commands all five joints in a single request.
    pub fn write_all_joints<P>(&mut self, pwms: P) -> Result<(), Error>
    where
        P: Borrow<[Value; JOINT_COUNT]>,
    {
        let pwms: &[Value; JOINT_COUNT] = pwms.borrow();
        self.write_holding_registers(JOINT_PWM_BASE, pwms)
    }

    /// Sends a clamper command. A [`ClamperState`] may be passed directly;
    /// states without a command of their own send `Stop`.
    pub fn write_clamper_instruction(
        &mut self,
        instruction: impl Into<ClamperInstruction>,
    ) -> Result<(), Error> {
        let instruction = instruction.into();
        debug!("Clamper instruction {instruction:?}");
        self.write_holding_register(CLAMPER_INSTRUCTION, instruction.value())
    }

    /// Sets the current (mA) at which the clamper considers itself closed.
    pub fn write_clamper_closing_current(&mut self, current_ma: Value) -> Result<(), Error> {
        self.write_holding_register(CLAMPER_CLOSING_CURRENT, current_ma)
    }

    /// Cached PWM value of a joint, or `0` for an index above [`MAX_JOINT_INDEX`].
    /// Refresh with [`Yj10Arm::read_all_joints_pwm`].
    pub fn joint(&self, index: usize) -> Value {
        if index > MAX_JOINT_INDEX {
            return 0;
        }

        self.holding_regs[JOINT_PWM_BASE as usize + index]
    }

    pub fn joints(&self) -> [Value; JOINT_COUNT] {
        let mut joints = [0; JOINT_COUNT];
        let base = JOINT_PWM_BASE as usize;
        joints.copy_from_slice(&self.holding_regs[base..base + JOINT_COUNT]);
        joints
    }

    /// Cached clamper state. Refresh with [`Yj10Arm::read_clamper`].
    pub fn clamper(&self) -> ClamperState {
        ClamperState::from_register(self.holding_regs[CLAMPER_STATE as usize])
    }

    /// Cached clamper current in mA.
    pub fn clamper_current(&self) -> Value {
        self.holding_regs[CLAMPER_CURRENT as usize]
    }

    /// Cached clamper closing current threshold in mA.
    pub fn clamper_closing_current(&self) -> Value {
        self.holding_regs[CLAMPER_CLOSING_CURRENT as usize]
    }

    /// Cached input register, or `0` when out of range.
    pub fn input_register(&self, addr: Address) -> Value {
        self.input_regs.get(addr as usize).copied().unwrap_or(0)
    }

    pub fn input_registers(&self) -> &[Value; INPUT_REGISTER_COUNT] {
        &self.input_regs
    }

    pub fn holding_registers(&self) -> &[Value; HOLDING_REGISTER_COUNT] {
        &self.holding_regs
    }
}

impl<C> Drop for Yj10Arm<C>
where
    C: Connect,
{
    fn drop(&mut self) {
        self.close();
    }
}

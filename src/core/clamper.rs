use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::core::modbus::Value;

/// The clamper (gripper) as seen from the arm.
///
/// Reading and commanding use different registers with different encodings:
/// the state register reports `0` as [`ClamperState::Middle`], while writing
/// `0` to the instruction register means [`ClamperInstruction::Stop`]. A
/// decoded state is therefore never `Stop`.
#[derive(Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Debug)]
pub enum ClamperState {
    Stop,
    Close,
    Open,
    Middle,
    Error,
}

impl ClamperState {
    /// Decodes the value of the clamper state register.
    pub fn from_register(value: Value) -> ClamperState {
        match value {
            0 => ClamperState::Middle,
            1 => ClamperState::Close,
            2 => ClamperState::Open,
            _ => ClamperState::Error,
        }
    }
}

impl Display for ClamperState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            ClamperState::Stop => "Stop",
            ClamperState::Close => "Close",
            ClamperState::Open => "Open",
            ClamperState::Middle => "Middle",
            ClamperState::Error => "Error",
        };
        write!(f, "{}", str)
    }
}

/// A command for the clamper instruction register.
#[repr(u16)]
#[derive(Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Debug, Default)]
pub enum ClamperInstruction {
    #[default]
    Stop = 0,
    Close = 1,
    Open = 2,
}

impl ClamperInstruction {
    pub fn value(self) -> Value {
        self as Value
    }
}

/// States with no matching command fall back to [`ClamperInstruction::Stop`].
impl From<ClamperState> for ClamperInstruction {
    fn from(state: ClamperState) -> Self {
        match state {
            ClamperState::Close => ClamperInstruction::Close,
            ClamperState::Open => ClamperInstruction::Open,
            ClamperState::Stop | ClamperState::Middle | ClamperState::Error => {
                ClamperInstruction::Stop
            }
        }
    }
}

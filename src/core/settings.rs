use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::core::modbus::{Error, Reason};

/// The slave address the arm ships with.
pub const DEFAULT_SLAVE_ID: u8 = 0x01;
pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_DATA_BITS: u8 = 8;
pub const DEFAULT_STOP_BITS: u8 = 1;

/// Highest unicast address permitted on a Modbus serial line.
pub const MAX_SLAVE_ID: u8 = 247;

#[derive(Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Debug, Default)]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
}

impl TryFrom<char> for Parity {
    type Error = Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase() {
            'N' => Ok(Parity::None),
            'E' => Ok(Parity::Even),
            'O' => Ok(Parity::Odd),
            _ => Err(Error::TransportInit(Reason::InvalidParity(value))),
        }
    }
}

impl Display for Parity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        };
        write!(f, "{letter}")
    }
}

/// Serial line parameters used to reach the arm.
///
/// Deserialising fills any missing field with its default, so only the
/// `device` needs to be given:
///
/// ```
/// use yj10::prelude::*;
///
/// let settings = Yj10Settings::new("/dev/ttyUSB0").with_baud_rate(115200);
/// assert_eq!(settings.slave, 1);
/// assert_eq!(settings.parity, Parity::None);
/// ```
#[derive(Clone, Serialize, Deserialize, Eq, PartialEq, Debug)]
#[serde(default)]
pub struct Yj10Settings {
    pub device: String,
    pub slave: u8,
    pub baud_rate: u32,
    pub parity: Parity,
    pub data_bits: u8,
    pub stop_bits: u8,

    /// Per-request response timeout. `None` blocks until the arm answers.
    pub timeout: Option<Duration>,
}

impl Default for Yj10Settings {
    fn default() -> Self {
        Yj10Settings {
            device: String::new(),
            slave: DEFAULT_SLAVE_ID,
            baud_rate: DEFAULT_BAUD_RATE,
            parity: Parity::None,
            data_bits: DEFAULT_DATA_BITS,
            stop_bits: DEFAULT_STOP_BITS,
            timeout: None,
        }
    }
}

impl Yj10Settings {
    pub fn new(device: impl Into<String>) -> Yj10Settings {
        Yj10Settings {
            device: device.into(),
            ..Default::default()
        }
    }

    pub fn with_slave(mut self, slave: u8) -> Self {
        self.slave = slave;
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn with_data_bits(mut self, data_bits: u8) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn with_stop_bits(mut self, stop_bits: u8) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Checks that the parameters describe a serial line a transport can be
    /// created for.
    pub fn validate(&self) -> Result<(), Error> {
        let reason = if self.device.trim().is_empty() {
            Reason::EmptyDevicePath
        } else if self.baud_rate == 0 {
            Reason::InvalidBaudRate(self.baud_rate)
        } else if !(5..=8).contains(&self.data_bits) {
            Reason::InvalidDataBits(self.data_bits)
        } else if !(1..=2).contains(&self.stop_bits) {
            Reason::InvalidStopBits(self.stop_bits)
        } else if self.slave > MAX_SLAVE_ID {
            Reason::InvalidSlaveId(self.slave)
        } else {
            return Ok(());
        };

        Err(Error::TransportInit(reason))
    }
}

impl Display for Yj10Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // /dev/ttyUSB0 @ 9600 8N1 => Slave(1)
        write!(
            f,
            "{} @ {} {}{}{} => Slave({})",
            self.device, self.baud_rate, self.data_bits, self.parity, self.stop_bits, self.slave
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_the_arm() {
        let settings = Yj10Settings::new("/dev/ttyUSB0");

        assert_eq!(settings.slave, 1);
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.parity, Parity::None);
        assert_eq!(settings.data_bits, 8);
        assert_eq!(settings.stop_bits, 1);
        assert_eq!(settings.timeout, None);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.to_string(), "/dev/ttyUSB0 @ 9600 8N1 => Slave(1)");
    }

    #[test]
    fn parity_from_letter() {
        assert_eq!(Parity::try_from('N').unwrap(), Parity::None);
        assert_eq!(Parity::try_from('e').unwrap(), Parity::Even);
        assert_eq!(Parity::try_from('O').unwrap(), Parity::Odd);
        assert!(matches!(
            Parity::try_from('X'),
            Err(Error::TransportInit(Reason::InvalidParity('X')))
        ));
    }

    #[test]
    fn rejects_malformed_parameters() {
        let cases = [
            (Yj10Settings::new(""), Reason::EmptyDevicePath),
            (
                Yj10Settings::new("/dev/ttyUSB0").with_baud_rate(0),
                Reason::InvalidBaudRate(0),
            ),
            (
                Yj10Settings::new("/dev/ttyUSB0").with_data_bits(9),
                Reason::InvalidDataBits(9),
            ),
            (
                Yj10Settings::new("/dev/ttyUSB0").with_stop_bits(3),
                Reason::InvalidStopBits(3),
            ),
            (
                Yj10Settings::new("/dev/ttyUSB0").with_slave(248),
                Reason::InvalidSlaveId(248),
            ),
        ];

        for (settings, expected) in cases {
            match settings.validate() {
                Err(Error::TransportInit(reason)) => assert_eq!(reason, expected),
                other => panic!("expected {expected:?}, had {other:?}"),
            }
        }
    }

    #[test]
    fn deserialises_with_defaults() {
        let settings: Yj10Settings =
            serde_json::from_str(r#"{ "device": "/dev/ttyS1", "parity": "Even" }"#)
                .expect("Must deserialise");

        assert_eq!(
            settings,
            Yj10Settings::new("/dev/ttyS1").with_parity(Parity::Even)
        );
    }
}

use crate::core::modbus::{Error, Transport};
use crate::core::Yj10Settings;

/// Opens a [`Transport`] session to the arm described by the settings.
pub trait Connect {
    type Transport: Transport;

    fn connect(&self, settings: &Yj10Settings) -> Result<Self::Transport, Error>;
}

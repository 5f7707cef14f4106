pub type Address = u16;
pub type Quantity = u16;
pub type Value = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFunction {
    InputRegisters(Address, Quantity),
    HoldingRegisters(Address, Quantity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFunction<'a> {
    SingleRegister(Address, Value),
    MultipleRegisters(Address, &'a [Value]),
}

impl ReadFunction {
    pub fn code(&self) -> u8 {
        match *self {
            ReadFunction::HoldingRegisters(..) => 0x03,
            ReadFunction::InputRegisters(..) => 0x04,
        }
    }

    pub fn address(&self) -> Address {
        match *self {
            ReadFunction::HoldingRegisters(addr, _) | ReadFunction::InputRegisters(addr, _) => addr,
        }
    }

    pub fn quantity(&self) -> Quantity {
        match *self {
            ReadFunction::HoldingRegisters(_, quant) | ReadFunction::InputRegisters(_, quant) => {
                quant
            }
        }
    }
}

impl<'a> WriteFunction<'a> {
    pub fn code(&self) -> u8 {
        match *self {
            WriteFunction::SingleRegister(..) => 0x06,
            WriteFunction::MultipleRegisters(..) => 0x10,
        }
    }

    pub fn address(&self) -> Address {
        match *self {
            WriteFunction::SingleRegister(addr, _) | WriteFunction::MultipleRegisters(addr, _) => {
                addr
            }
        }
    }
}

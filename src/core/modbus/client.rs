use super::{Address, Error, Fault, Quantity, ReadFunction, Reason, Transport, Value, WriteFunction};

pub trait Client: Transport {
    fn read_holding_registers(&mut self, addr: Address, quant: Quantity) -> Result<Vec<Value>, Error> {
        let values = self.read(&ReadFunction::HoldingRegisters(addr, quant))?;
        check_reply_size(quant, values)
    }

    fn read_input_registers(&mut self, addr: Address, quant: Quantity) -> Result<Vec<Value>, Error> {
        let values = self.read(&ReadFunction::InputRegisters(addr, quant))?;
        check_reply_size(quant, values)
    }

    fn write_register(&mut self, addr: Address, value: Value) -> Result<(), Error> {
        self.write(&WriteFunction::SingleRegister(addr, value))
    }

    fn write_registers(&mut self, addr: Address, values: &[Value]) -> Result<(), Error> {
        self.write(&WriteFunction::MultipleRegisters(addr, values))
    }
}

impl<T> Client for T where T: Transport + ?Sized {}

fn check_reply_size(quant: Quantity, values: Vec<Value>) -> Result<Vec<Value>, Error> {
    if values.len() != quant as usize {
        return Err(Fault::from(Reason::UnexpectedReplySize {
            expected: quant as usize,
            received: values.len(),
        })
        .into());
    }

    Ok(values)
}

#[cfg(test)]
mod test {
    use super::*;

    /// Answers every read with a fixed reply, regardless of the request.
    struct Canned(Vec<Value>);

    impl Transport for Canned {
        fn read(&mut self, _function: &ReadFunction) -> Result<Vec<Value>, Error> {
            Ok(self.0.clone())
        }

        fn write(&mut self, _function: &WriteFunction) -> Result<(), Error> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn accepts_reply_of_requested_size() {
        let mut transport = Canned(vec![1, 2, 3]);
        let values = transport.read_holding_registers(0, 3).expect("Must read");
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_short_reply() {
        let mut transport = Canned(vec![1, 2]);
        let result = transport.read_input_registers(0, 35);

        assert!(matches!(
            result,
            Err(Error::Io(Fault::InvalidData(Reason::UnexpectedReplySize {
                expected: 35,
                received: 2
            })))
        ));
    }
}

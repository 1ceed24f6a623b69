extern crate std;

use core::convert::Infallible;
use embedded_io::ErrorKind;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

/// Serial transmitter that records every byte written.
#[derive(Clone, Default)]
pub struct SerialLog(Rc<RefCell<Vec<u8>>>);
impl SerialLog {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    pub fn take(&self) -> Vec<u8> {
        core::mem::take(&mut *self.0.borrow_mut())
    }
}
impl embedded_io::ErrorType for SerialLog {
    type Error = Infallible;
}
impl embedded_io::Write for SerialLog {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Serial transmitter whose writes always fail.
pub struct BrokenSerial;
impl embedded_io::ErrorType for BrokenSerial {
    type Error = ErrorKind;
}
impl embedded_io::Write for BrokenSerial {
    fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
        Err(ErrorKind::Other)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }
}

/// Serial receiver replaying a script of reads; end of stream once the script runs out.
#[derive(Default)]
pub struct ScriptedReader {
    script: VecDeque<Result<Vec<u8>, ErrorKind>>,
}
impl ScriptedReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.script.push_back(Ok(bytes.into()));
        self
    }

    pub fn error(mut self, kind: ErrorKind) -> Self {
        self.script.push_back(Err(kind));
        self
    }
}
impl embedded_io_async::ErrorType for ScriptedReader {
    type Error = ErrorKind;
}
impl embedded_io_async::Read for ScriptedReader {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.script.pop_front() {
            None => Ok(0),
            Some(Err(kind)) => Err(kind),
            Some(Ok(mut chunk)) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    self.script.push_front(Ok(chunk.split_off(n)));
                }
                Ok(n)
            }
        }
    }
}

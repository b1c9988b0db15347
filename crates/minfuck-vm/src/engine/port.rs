//! Byte-level I/O consumed by the `out` and `in` control codes.

use std::io::{self, Read, Write};

/// Single-byte input and output.
pub trait Port {
    /// Block until one byte is available. `None` at end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Write exactly one byte and make it visible.
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;
}

impl<P: Port + ?Sized> Port for &mut P {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }
}

/// [`Port`] over any reader and writer. Every byte written is flushed.
#[derive(Debug)]
pub struct StreamPort<R, W> {
    input: R,
    output: W,
}

/// The process's standard streams.
pub type StdPort = StreamPort<io::Stdin, io::Stdout>;

impl StdPort {
    pub fn stdio() -> Self {
        Self::new(io::stdin(), io::stdout())
    }
}

impl<R, W> StreamPort<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: Read, W: Write> Port for StreamPort<R, W> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.output.write_all(&[byte])?;
        self.output.flush()
    }
}

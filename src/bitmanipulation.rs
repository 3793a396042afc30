use std::io::{self, ErrorKind, Read, Write};

use crate::{HuffError, Result};

/// Output budget of a [`BitWriter`], so a runaway encoder fails instead of filling the disk.
pub const DEFAULT_MAX_BYTES: usize = 1_000_000_000;

/// Packs bits MSB-first into bytes.
///
/// [`BitWriter::close`] must be called to terminate the stream: it writes the
/// last (possibly partial) byte followed by the number of valid bits in it,
/// so a closed stream is always at least two bytes long.
pub struct BitWriter<W: Write> {
    sink: W,
    current: u8,
    bits_in_current: u8,
    total_bytes: usize,
    bits_written: usize,
    max_bytes: usize,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        Self::with_max_bytes(sink, DEFAULT_MAX_BYTES)
    }

    pub fn with_max_bytes(sink: W, max_bytes: usize) -> Self {
        BitWriter {
            sink,
            current: 0,
            bits_in_current: 0,
            total_bytes: 0,
            bits_written: 0,
            max_bytes,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.bits_in_current += 1;
        self.current |= (bit as u8) << (8 - self.bits_in_current);
        self.bits_written += 1;
        if self.bits_in_current == 8 {
            let byte = self.current;
            self.current = 0;
            self.bits_in_current = 0;
            self.emit(&[byte])?;
        }
        Ok(())
    }

    pub fn write(&mut self, bits: &[bool]) -> Result<()> {
        for &bit in bits {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Writes whole bytes, only allowed on a byte boundary.
    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.bits_in_current != 0 {
            return Err(HuffError::IoError(io::Error::new(
                ErrorKind::InvalidInput,
                "raw bytes written in the middle of a byte",
            )));
        }
        self.emit(bytes)
    }

    /// Bits written with [`BitWriter::write_bit`] so far, raw bytes excluded.
    pub fn bits_written(&self) -> usize {
        self.bits_written
    }

    /// Flushes the partial byte and the valid bit count, returns the total
    /// number of bytes of the stream.
    pub fn close(mut self) -> Result<usize> {
        self.sink.write_all(&[self.current, self.bits_in_current])?;
        self.sink.flush()?;
        Ok(self.total_bytes + 2)
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<()> {
        if self.total_bytes + bytes.len() > self.max_bytes {
            return Err(HuffError::StreamOverflow {
                max_bytes: self.max_bytes,
            });
        }
        self.sink.write_all(bytes)?;
        self.total_bytes += bytes.len();
        Ok(())
    }
}

/// Reads back a stream produced by [`BitWriter`].
///
/// The reader looks three bytes ahead: once no byte follows `next`, `next`
/// is the trailer holding the number of valid bits of `current`.
pub struct BitReader<R: Read> {
    source: R,
    current: u8,
    next: u8,
    after_next: Option<u8>,
    mask: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(mut source: R) -> Result<Self> {
        let current = read_byte(&mut source)?.ok_or(HuffError::TruncatedStream(
            "bit stream did not have two bytes",
        ))?;
        let next = read_byte(&mut source)?.ok_or(HuffError::TruncatedStream(
            "bit stream did not have two bytes",
        ))?;
        let after_next = read_byte(&mut source)?;
        let reader = BitReader {
            source,
            current,
            next,
            after_next,
            mask: 0x80,
        };
        reader.check_trailer()?;
        Ok(reader)
    }

    pub fn has_next(&self) -> bool {
        self.after_next.is_some() || self.next != 0
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        let bit = self.current & self.mask != 0;
        match self.after_next {
            // Draining the final byte, `next` counts the bits left in it
            None => {
                if self.next == 0 {
                    return Err(HuffError::TruncatedStream("no more bits"));
                }
                self.next -= 1;
                self.mask >>= 1;
            }
            Some(after_next) => {
                self.mask >>= 1;
                if self.mask == 0 {
                    self.mask = 0x80;
                    self.current = self.next;
                    self.next = after_next;
                    self.after_next = read_byte(&mut self.source)?;
                    self.check_trailer()?;
                }
            }
        }
        Ok(bit)
    }

    fn check_trailer(&self) -> Result<()> {
        match self.after_next {
            None if self.next > 8 => Err(HuffError::InvalidTrailer(self.next)),
            _ => Ok(()),
        }
    }
}

fn read_byte<R: Read>(source: &mut R) -> Result<Option<u8>> {
    let mut buf = [0];
    loop {
        match source.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

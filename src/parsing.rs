//! Parsing functions to read subpacket data from a [Buf].

use bytes::{Buf, Bytes};

use crate::errors::{Error, Result};

pub trait BufParsing: Buf + Sized {
    fn read_u8(&mut self) -> Result<u8> {
        self.ensure_remaining(1)?;
        Ok(self.get_u8())
    }

    fn read_be_u16(&mut self) -> Result<u16> {
        self.ensure_remaining(2)?;
        Ok(self.get_u16())
    }

    fn read_be_u32(&mut self) -> Result<u32> {
        self.ensure_remaining(4)?;
        Ok(self.get_u32())
    }

    fn read_array<const C: usize>(&mut self) -> Result<[u8; C]> {
        self.ensure_remaining(C)?;
        let mut arr = [0u8; C];
        self.copy_to_slice(&mut arr);
        Ok(arr)
    }

    fn take_bytes(&mut self, size: usize) -> Result<Bytes> {
        self.ensure_remaining(size)?;
        Ok(self.copy_to_bytes(size))
    }

    fn rest(&mut self) -> Bytes {
        let len = self.remaining();
        self.copy_to_bytes(len)
    }

    fn ensure_remaining(&self, size: usize) -> Result<()> {
        if self.remaining() < size {
            return Err(Error::TruncatedInput {
                needed: size,
                remaining: self.remaining(),
                backtrace: snafu::GenerateImplicitData::generate(),
            });
        }

        Ok(())
    }
}

impl<B: Buf> BufParsing for B {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_past_end_is_truncated() {
        let mut buf = &[0x01, 0x02][..];
        assert_eq!(buf.read_be_u16().unwrap(), 0x0102);
        let err = buf.read_u8().unwrap_err();
        assert!(err.is_incomplete());
    }

    #[test]
    fn take_bytes_does_not_overread() {
        let mut buf = &[1u8, 2, 3][..];
        let err = buf.take_bytes(4).unwrap_err();
        assert!(err.is_incomplete());
        // nothing consumed by the failed take
        assert_eq!(buf.remaining(), 3);
    }
}

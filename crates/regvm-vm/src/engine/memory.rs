//! Guest RAM.

use regvm_bytecode::IMM_FORM_SIZE;

use super::error::{ConfigError, RuntimeError};

/// Width of a memory word in bytes.
pub const WORD_SIZE: usize = 4;

/// Fixed-size, zero-initialized byte buffer addressed by 32-bit offsets.
///
/// Words are little-endian. Every access is bounds-checked against the
/// whole access, not just its first byte.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Copy `image` to address 0.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), ConfigError> {
        let Some(dst) = self.bytes.get_mut(..image.len()) else {
            return Err(ConfigError::ImageTooLarge {
                size: image.len(),
                memory: self.bytes.len(),
            });
        };
        dst.copy_from_slice(image);
        Ok(())
    }

    /// Borrow `size` bytes starting at `addr`.
    pub fn slice(&self, addr: u32, size: usize) -> Result<&[u8], RuntimeError> {
        let start = addr as usize;
        start
            .checked_add(size)
            .and_then(|end| self.bytes.get(start..end))
            .ok_or_else(|| self.out_of_bounds(addr, size))
    }

    fn slice_mut(&mut self, addr: u32, size: usize) -> Result<&mut [u8], RuntimeError> {
        let err = self.out_of_bounds(addr, size);
        let start = addr as usize;
        start
            .checked_add(size)
            .and_then(|end| self.bytes.get_mut(start..end))
            .ok_or(err)
    }

    pub fn read_u32(&self, addr: u32) -> Result<u32, RuntimeError> {
        let bytes = self.slice(addr, WORD_SIZE)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn write_u32(&mut self, addr: u32, value: u32) -> Result<(), RuntimeError> {
        self.slice_mut(addr, WORD_SIZE)?
            .copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Bytes available for decoding at `addr`: up to the longest instruction,
    /// fewer near the end of memory.
    ///
    /// Only `addr` itself must be inside memory; a short window makes the
    /// decoder report a truncated instruction.
    pub fn fetch(&self, addr: u32) -> Result<&[u8], RuntimeError> {
        let start = addr as usize;
        if start >= self.bytes.len() {
            return Err(self.out_of_bounds(addr, 1));
        }
        let end = (start + IMM_FORM_SIZE).min(self.bytes.len());
        Ok(&self.bytes[start..end])
    }

    fn out_of_bounds(&self, addr: u32, size: usize) -> RuntimeError {
        RuntimeError::OutOfBounds {
            addr,
            size,
            len: self.bytes.len(),
        }
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

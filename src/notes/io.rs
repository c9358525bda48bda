//! Byte-order-aware reads over an in-memory buffer. Every multi-byte field
//! in a note obeys the byte order recorded in the ELF file header, not the
//! host's, so the order is supplied by the caller and threaded through
//! every read.
use super::DecodeError;

/// Byte order recorded in the ELF ident.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// The target's word size category. Changes the width of several core-dump
/// descriptor fields.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Class {
    Elf32,
    Elf64,
}

impl Class {
    /// Builds a class from the EI_CLASS ident byte.
    pub fn from_ident(ei_class: u8) -> Result<Class, DecodeError> {
        match ei_class {
            1 => Ok(Class::Elf32),
            2 => Ok(Class::Elf64),
            other => Err(DecodeError::UnsupportedClass(other)),
        }
    }
}

pub fn align_to_word(n: u32) -> u32 {
    (n + 3) & !3
}

/// A cursor over note bytes. Reads advance the cursor and fail with a
/// `Truncated` error naming the field when the buffer runs out mid-field.
pub struct Stream<'a> {
    data: &'a [u8],
    pub offset: usize,
    order: ByteOrder,
}

impl<'a> Stream<'a> {
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Stream {
            data,
            offset: 0,
            order,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Advances the cursor without touching the bytes. Saturates at the end
    /// of the buffer, matching seek semantics: a skip past the end is only
    /// noticed by the next read.
    pub fn skip(&mut self, count: usize) {
        self.offset = usize::min(self.offset + count, self.data.len());
    }

    pub fn read_bytes(&mut self, count: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        let end = self
            .offset
            .checked_add(count)
            .ok_or(DecodeError::Truncated(field))?;
        let bytes = self
            .data
            .get(self.offset..end)
            .ok_or(DecodeError::Truncated(field))?;
        self.offset = end;
        Ok(bytes)
    }

    pub fn read_byte(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1, field)?[0])
    }

    pub fn read_half(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        let bytes = self.read_bytes(2, field)?.try_into().unwrap();
        Ok(match self.order {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        })
    }

    pub fn read_word(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let bytes = self.read_bytes(4, field)?.try_into().unwrap();
        Ok(match self.order {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        })
    }

    pub fn read_int(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        Ok(self.read_word(field)? as i32)
    }

    pub fn read_xword(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        let bytes = self.read_bytes(8, field)?.try_into().unwrap();
        Ok(match self.order {
            ByteOrder::Little => u64::from_le_bytes(bytes),
            ByteOrder::Big => u64::from_be_bytes(bytes),
        })
    }

    pub fn read_sxword(&mut self, field: &'static str) -> Result<i64, DecodeError> {
        Ok(self.read_xword(field)? as i64)
    }

    /// Reads a machine-word-sized signed integer, widened to i64.
    pub fn read_long(&mut self, class: Class, field: &'static str) -> Result<i64, DecodeError> {
        match class {
            Class::Elf64 => self.read_sxword(field),
            Class::Elf32 => Ok(self.read_int(field)? as i64),
        }
    }

    /// Reads a machine-word-sized unsigned integer, widened to u64.
    pub fn read_ulong(&mut self, class: Class, field: &'static str) -> Result<u64, DecodeError> {
        match class {
            Class::Elf64 => self.read_xword(field),
            Class::Elf32 => Ok(self.read_word(field)? as u64),
        }
    }

    /// The kernel's pid type is a fixed 32-bit int on both classes.
    pub fn read_pid(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        self.read_int(field)
    }

    /// __kernel_uid_t is 16 bits on 32-bit targets and 32 bits on 64-bit ones.
    pub fn read_uid(&mut self, class: Class, field: &'static str) -> Result<u32, DecodeError> {
        match class {
            Class::Elf64 => self.read_word(field),
            Class::Elf32 => Ok(self.read_half(field)? as u32),
        }
    }

    /// __kernel_gid_t, same widths as uid.
    pub fn read_gid(&mut self, class: Class, field: &'static str) -> Result<u32, DecodeError> {
        self.read_uid(class, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_order_is_honored() {
        let data = [0x01u8, 0x02, 0x03, 0x04];
        let mut le = Stream::new(&data, ByteOrder::Little);
        let mut be = Stream::new(&data, ByteOrder::Big);
        assert_eq!(le.read_word("w").unwrap(), 0x04030201);
        assert_eq!(be.read_word("w").unwrap(), 0x01020304);
    }

    #[test]
    fn truncated_read_names_the_field() {
        let data = [0x01u8, 0x02];
        let mut s = Stream::new(&data, ByteOrder::Little);
        assert_eq!(s.read_word("namesize"), Err(DecodeError::Truncated("namesize")));
    }

    #[test]
    fn class_width_reads() {
        let data = [0xffu8; 16];
        let mut s = Stream::new(&data, ByteOrder::Little);
        assert_eq!(s.read_ulong(Class::Elf32, "flag").unwrap(), 0xffff_ffff);
        assert_eq!(s.read_ulong(Class::Elf64, "flag").unwrap(), u64::MAX);
        assert_eq!(s.offset, 12);

        let mut s = Stream::new(&data, ByteOrder::Little);
        assert_eq!(s.read_long(Class::Elf32, "v").unwrap(), -1);
        assert_eq!(s.read_long(Class::Elf64, "v").unwrap(), -1);
    }

    #[test]
    fn uid_is_narrow_on_32_bit_targets() {
        let data = [0x39u8, 0x30, 0x00, 0x00];
        let mut s = Stream::new(&data, ByteOrder::Little);
        assert_eq!(s.read_uid(Class::Elf32, "uid").unwrap(), 12345);
        assert_eq!(s.offset, 2);

        let mut s = Stream::new(&data, ByteOrder::Little);
        assert_eq!(s.read_uid(Class::Elf64, "uid").unwrap(), 12345);
        assert_eq!(s.offset, 4);
    }

    #[test]
    fn pid_width_ignores_class() {
        let data = [0x2au8, 0x00, 0x00, 0x00];
        let mut s = Stream::new(&data, ByteOrder::Little);
        assert_eq!(s.read_pid("pid").unwrap(), 42);
        assert_eq!(s.offset, 4);
    }

    #[test]
    fn skip_saturates_at_the_end() {
        let data = [0u8; 4];
        let mut s = Stream::new(&data, ByteOrder::Little);
        s.skip(100);
        assert!(s.is_at_end());
        assert_eq!(s.read_byte("b"), Err(DecodeError::Truncated("b")));
    }

    #[test]
    fn unknown_class_ident_is_rejected() {
        assert_eq!(Class::from_ident(1), Ok(Class::Elf32));
        assert_eq!(Class::from_ident(2), Ok(Class::Elf64));
        assert_eq!(Class::from_ident(3), Err(DecodeError::UnsupportedClass(3)));
    }
}

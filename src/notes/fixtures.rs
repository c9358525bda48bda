//! Hand-built byte fixtures for the decoder tests.
use super::{ByteOrder, Class};

/// Writes integers in a chosen byte order, mirroring what the kernel's
/// core-dump writer would emit.
pub(crate) struct PayloadWriter {
    order: ByteOrder,
    pub bytes: Vec<u8>,
}

impl PayloadWriter {
    pub fn new(order: ByteOrder) -> Self {
        PayloadWriter {
            order,
            bytes: Vec::new(),
        }
    }

    pub fn u8(&mut self, v: u8) {
        self.bytes.push(v);
    }

    pub fn u16(&mut self, v: u16) {
        match self.order {
            ByteOrder::Little => self.bytes.extend_from_slice(&v.to_le_bytes()),
            ByteOrder::Big => self.bytes.extend_from_slice(&v.to_be_bytes()),
        }
    }

    pub fn u32(&mut self, v: u32) {
        match self.order {
            ByteOrder::Little => self.bytes.extend_from_slice(&v.to_le_bytes()),
            ByteOrder::Big => self.bytes.extend_from_slice(&v.to_be_bytes()),
        }
    }

    pub fn u64(&mut self, v: u64) {
        match self.order {
            ByteOrder::Little => self.bytes.extend_from_slice(&v.to_le_bytes()),
            ByteOrder::Big => self.bytes.extend_from_slice(&v.to_be_bytes()),
        }
    }

    pub fn i32(&mut self, v: i32) {
        self.u32(v as u32);
    }

    pub fn i64(&mut self, v: i64) {
        self.u64(v as u64);
    }

    /// A machine-word-sized value at the width the class dictates.
    pub fn ulong(&mut self, class: Class, v: u64) {
        match class {
            Class::Elf64 => self.u64(v),
            Class::Elf32 => self.u32(v as u32),
        }
    }

    /// Uid/gid width: 16 bits on Elf32, 32 on Elf64.
    pub fn uid(&mut self, class: Class, v: u32) {
        match class {
            Class::Elf64 => self.u32(v),
            Class::Elf32 => self.u16(v as u16),
        }
    }

    pub fn pad(&mut self, count: usize) {
        self.bytes.resize(self.bytes.len() + count, 0);
    }

    /// A fixed-width field holding a NUL-padded string.
    pub fn fixed_str(&mut self, width: usize, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
        self.pad(width - s.len());
    }
}

/// Builds a whole note section: headers, NUL-terminated names, and 4-byte
/// padding after every blob.
pub(crate) struct NoteBuilder {
    w: PayloadWriter,
}

impl NoteBuilder {
    pub fn new(order: ByteOrder) -> Self {
        NoteBuilder {
            w: PayloadWriter::new(order),
        }
    }

    pub fn note(mut self, name: &str, ntype: u32, desc: &[u8]) -> Self {
        let namesize = name.len() as u32 + 1; // count the trailing NUL
        self.w.u32(namesize);
        self.w.u32(desc.len() as u32);
        self.w.u32(ntype);
        self.w.bytes.extend_from_slice(name.as_bytes());
        self.w.u8(0);
        self.align4();
        self.w.bytes.extend_from_slice(desc);
        self.align4();
        self
    }

    /// A bare 3-word header with no body, for malformed-length cases.
    pub fn raw_header(mut self, namesize: u32, descsize: u32, ntype: u32) -> Self {
        self.w.u32(namesize);
        self.w.u32(descsize);
        self.w.u32(ntype);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.w.bytes
    }

    fn align4(&mut self) {
        let padding = (4 - self.w.bytes.len() % 4) % 4;
        self.w.pad(padding);
    }
}

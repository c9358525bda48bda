//! Decoders for ELF note records and the kernel core-dump descriptors
//! embedded in them. The generic structural walk over an ELF file (headers,
//! section and segment tables, symbols) is handled by the `elf` crate; this
//! module only consumes raw note-section bytes together with the byte order
//! and class recorded in the file header.
//!
//! A note section is a sequence of records, each starting with three 32-bit
//! words (namesize, descsize, type) followed by the name and descriptor
//! blobs, both padded to a 4-byte boundary. Core files use the descriptor
//! blobs to store fixed-layout kernel structs such as elf_prstatus and
//! elf_prpsinfo, whose field widths depend on whether the target is a
//! 32-bit or 64-bit ELF. See https://man7.org/linux/man-pages/man5/elf.5.html
//! and include/uapi/linux/elfcore.h in the kernel sources.
pub mod io;
pub mod note;
pub mod prpsinfo;
pub mod prstatus;
pub mod registers;

pub use io::*;
pub use note::*;
pub use prpsinfo::*;
pub use prstatus::*;
pub use registers::*;

use thiserror::Error;

/// Errors from note and descriptor decoding. The input is always a static
/// in-memory buffer so none of these are retryable; they surface to the
/// caller as-is. A type-filtered lookup that exhausts the stream is not an
/// error, it returns `Ok(None)`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The bytes did not come from a section or segment declared as note data.
    #[error("invalid section type {found:#x}: not a note section")]
    InvalidSectionType { found: u32 },

    /// The stream ended in the middle of the named field.
    #[error("truncated data while reading {0}")]
    Truncated(&'static str),

    /// A declared name or descriptor length does not fit a non-negative
    /// 32-bit signed value.
    #[error("malformed {field} length {value:#x}")]
    MalformedLength { field: &'static str, value: u32 },

    /// A descriptor decode was requested on a note of the wrong type.
    #[error("wrong note type {found:#x}: expected {expected:#x}")]
    WrongNoteType { expected: u32, found: u32 },

    /// The ELF ident class byte is neither ELFCLASS32 nor ELFCLASS64.
    #[error("unsupported ELF class {0:#x}")]
    UnsupportedClass(u8),
}

#[cfg(test)]
pub(crate) mod fixtures;

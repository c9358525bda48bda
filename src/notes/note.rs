//! The note stream decoder: walks the raw bytes of a note section into
//! discrete (name, type, data) records.
use super::{ByteOrder, DecodeError, Stream, align_to_word};
use elf::abi::SHT_NOTE;

pub const NT_PRSTATUS: u32 = 0x1;
pub const NT_PRPSINFO: u32 = 0x3;

/// Go toolchain build id. Same value as NT_PRXREG; Go notes are told apart
/// by their owner name.
pub const NT_GO_BUILD: u32 = 0x4;

// Core-dump note types exported by the kernel via PTRACE_GETREGSET, see
// include/uapi/linux/elf.h. Sorted by value; used only for display names.
const NOTE_TYPE_NAMES: &[(u32, &str)] = &[
    (0x1, "NT_PRSTATUS"),
    (0x2, "NT_PRFPREG"),
    (0x3, "NT_PRPSINFO"),
    (0x4, "NT_PRXREG"),
    (0x5, "NT_PLATFORM"),
    (0x6, "NT_AUXV"),
    (0x100, "NT_PPC_VMX"),
    (0x101, "NT_PPC_SPE"),
    (0x102, "NT_PPC_VSX"),
    (0x103, "NT_PPC_TAR"),
    (0x104, "NT_PPC_PPR"),
    (0x105, "NT_PPC_DSCR"),
    (0x106, "NT_PPC_EBB"),
    (0x107, "NT_PPC_PMU"),
    (0x108, "NT_PPC_TM_CGPR"),
    (0x109, "NT_PPC_TM_CFPR"),
    (0x10a, "NT_PPC_TM_CVMX"),
    (0x10b, "NT_PPC_TM_CVSX"),
    (0x10c, "NT_PPC_TM_SPR"),
    (0x10d, "NT_PPC_TM_CTAR"),
    (0x10e, "NT_PPC_TM_CPPR"),
    (0x10f, "NT_PPC_TM_CDSCR"),
    (0x200, "NT_386_TLS"),
    (0x201, "NT_386_IOPERM"),
    (0x202, "NT_X86_XSTATE"),
    (0x300, "NT_S390_HIGH_GPRS"),
    (0x301, "NT_S390_TIMER"),
    (0x302, "NT_S390_TODCMP"),
    (0x303, "NT_S390_TODPREG"),
    (0x304, "NT_S390_CTRS"),
    (0x305, "NT_S390_PREFIX"),
    (0x306, "NT_S390_LAST_BREAK"),
    (0x307, "NT_S390_SYSTEM_CALL"),
    (0x308, "NT_S390_TDB"),
    (0x309, "NT_S390_VXRS_LOW"),
    (0x30a, "NT_S390_VXRS_HIGH"),
    (0x400, "NT_ARM_VFP"),
    (0x401, "NT_ARM_TLS"),
    (0x402, "NT_ARM_HW_BREAK"),
    (0x403, "NT_ARM_HW_WATCH"),
    (0x404, "NT_ARM_SYSTEM_CALL"),
    (0x500, "NT_METAG_CBUF"),
    (0x501, "NT_METAG_RPIPE"),
    (0x502, "NT_METAG_TLS"),
    (0x46494c45, "NT_FILE"),
    (0x46e62b7f, "NT_PRXFPREG"),
    (0x53494749, "NT_SIGINFO"),
];

/// Display name for a note type. Exact matches use the registry; unknown
/// values fall back to the nearest lower known name plus an offset, or to a
/// hex literal when nothing is lower. Purely cosmetic, the decode path
/// never consults this.
pub fn note_type_name(value: u32) -> String {
    match NOTE_TYPE_NAMES.binary_search_by_key(&value, |&(v, _)| v) {
        Ok(i) => NOTE_TYPE_NAMES[i].1.to_string(),
        Err(0) => format!("{value:#x}"),
        Err(i) => {
            let (base, name) = NOTE_TYPE_NAMES[i - 1];
            format!("{}+{}", name, value - base)
        }
    }
}

/// One decoded note record. `name` is the owner tag (e.g. "CORE") with
/// trailing NULs stripped; `data` is the exact unpadded descriptor payload.
#[derive(Debug, Eq, PartialEq)]
pub struct Note {
    pub name: String,
    pub ntype: u32,
    pub data: Vec<u8>,
}

impl Note {
    /// A fresh cursor over the descriptor payload.
    pub fn open(&self, order: ByteOrder) -> Stream<'_> {
        Stream::new(&self.data, order)
    }

    pub fn type_name(&self) -> String {
        note_type_name(self.ntype)
    }
}

struct NoteHeader {
    namesize: u32,
    descsize: u32,
    ntype: u32,
}

fn read_note_header(s: &mut Stream) -> Result<NoteHeader, DecodeError> {
    let namesize = s.read_word("namesize")?;
    let descsize = s.read_word("descsize")?;
    let ntype = s.read_word("type")?;

    // The ABI declares these as signed 32-bit, so anything with the sign
    // bit set is garbage rather than a huge record.
    if namesize > i32::MAX as u32 {
        return Err(DecodeError::MalformedLength {
            field: "namesize",
            value: namesize,
        });
    }
    if descsize > i32::MAX as u32 {
        return Err(DecodeError::MalformedLength {
            field: "descsize",
            value: descsize,
        });
    }
    Ok(NoteHeader {
        namesize,
        descsize,
        ntype,
    })
}

/// Reads `size` bytes and discards the padding up to the next 4-byte
/// boundary. The padding must be present, even after the final record.
fn read_aligned4<'a>(
    s: &mut Stream<'a>,
    size: u32,
    field: &'static str,
) -> Result<&'a [u8], DecodeError> {
    let full = align_to_word(size) as usize;
    let bytes = s.read_bytes(full, field)?;
    Ok(&bytes[..size as usize])
}

pub(crate) fn nul_trimmed_string(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn require_note_section(section_type: u32) -> Result<(), DecodeError> {
    if section_type != SHT_NOTE {
        return Err(DecodeError::InvalidSectionType {
            found: section_type,
        });
    }
    Ok(())
}

/// Decodes every record in a note section. End-of-stream exactly at a
/// record boundary terminates the walk normally; running out anywhere else
/// is a truncation error.
pub fn read_notes(
    section_type: u32,
    data: &[u8],
    order: ByteOrder,
) -> Result<Vec<Note>, DecodeError> {
    require_note_section(section_type)?;

    let mut notes = Vec::new();
    let mut s = Stream::new(data, order);
    while !s.is_at_end() {
        let header = read_note_header(&mut s)?;
        let name = nul_trimmed_string(read_aligned4(&mut s, header.namesize, "name")?);
        let data = read_aligned4(&mut s, header.descsize, "desc")?.to_vec();
        notes.push(Note {
            name,
            ntype: header.ntype,
            data,
        });
    }
    Ok(notes)
}

/// Finds the first record of the given type. Non-matching records are
/// skipped by advancing the cursor over their combined padded length, with
/// no allocation. Exhausting the stream without a match is the normal
/// `Ok(None)` outcome, not an error.
pub fn read_note_by_type(
    section_type: u32,
    data: &[u8],
    order: ByteOrder,
    search: u32,
) -> Result<Option<Note>, DecodeError> {
    require_note_section(section_type)?;

    let mut s = Stream::new(data, order);
    while !s.is_at_end() {
        let header = read_note_header(&mut s)?;
        if header.ntype != search {
            let skip = (header.namesize as usize + header.descsize as usize + 3) & !3;
            s.skip(skip);
            continue;
        }

        let name = nul_trimmed_string(read_aligned4(&mut s, header.namesize, "name")?);
        let data = read_aligned4(&mut s, header.descsize, "desc")?.to_vec();
        return Ok(Some(Note {
            name,
            ntype: header.ntype,
            data,
        }));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::NoteBuilder;
    use super::*;

    #[test]
    fn decodes_a_full_stream() {
        let bytes = NoteBuilder::new(ByteOrder::Little)
            .note("CORE", NT_PRSTATUS, &[1, 2, 3, 4, 5, 6, 7, 8])
            .note("CORE", NT_PRPSINFO, &[9, 9, 9])
            .note("GNU", 0x10, &[0xde, 0xad])
            .build();

        let notes = read_notes(SHT_NOTE, &bytes, ByteOrder::Little).unwrap();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].name, "CORE");
        assert_eq!(notes[0].ntype, NT_PRSTATUS);
        assert_eq!(notes[0].data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(notes[1].data, vec![9, 9, 9]);
        assert_eq!(notes[2].name, "GNU");
        assert_eq!(notes[2].data, vec![0xde, 0xad]);
    }

    // Re-encoding each record (header + padded name + padded data) must
    // reproduce the original byte length.
    #[test]
    fn padded_lengths_round_trip() {
        let bytes = NoteBuilder::new(ByteOrder::Little)
            .note("CORE", NT_PRSTATUS, &[1, 2, 3, 4, 5])
            .note("LINUX", 0x202, &[7; 13])
            .build();

        let notes = read_notes(SHT_NOTE, &bytes, ByteOrder::Little).unwrap();
        let total: usize = notes
            .iter()
            .map(|n| {
                // namesize counts the trailing NUL the builder wrote
                let namesize = n.name.len() + 1;
                12 + align_to_word(namesize as u32) as usize
                    + align_to_word(n.data.len() as u32) as usize
            })
            .sum();
        assert_eq!(total, bytes.len());
    }

    #[test]
    fn big_endian_stream() {
        let bytes = NoteBuilder::new(ByteOrder::Big)
            .note("CORE", NT_PRPSINFO, &[1, 2, 3, 4])
            .build();

        let notes = read_notes(SHT_NOTE, &bytes, ByteOrder::Big).unwrap();
        assert_eq!(notes[0].ntype, NT_PRPSINFO);
        assert_eq!(notes[0].data, vec![1, 2, 3, 4]);
    }

    #[test]
    fn rejects_non_note_sections_before_reading() {
        let err = read_notes(elf::abi::SHT_PROGBITS, &[0xff; 64], ByteOrder::Little);
        assert_eq!(
            err,
            Err(DecodeError::InvalidSectionType {
                found: elf::abi::SHT_PROGBITS
            })
        );
    }

    #[test]
    fn empty_stream_decodes_to_no_notes() {
        let notes = read_notes(SHT_NOTE, &[], ByteOrder::Little).unwrap();
        assert!(notes.is_empty());
    }

    #[test]
    fn truncated_header_is_an_error() {
        // Two bytes left where the next namesize should be.
        let mut bytes = NoteBuilder::new(ByteOrder::Little)
            .note("CORE", NT_PRSTATUS, &[1, 2, 3, 4])
            .build();
        bytes.extend_from_slice(&[0, 0]);

        let err = read_notes(SHT_NOTE, &bytes, ByteOrder::Little);
        assert_eq!(err, Err(DecodeError::Truncated("namesize")));
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let mut bytes = NoteBuilder::new(ByteOrder::Little)
            .note("CORE", NT_PRSTATUS, &[1, 2, 3, 4, 5, 6, 7, 8])
            .build();
        bytes.truncate(bytes.len() - 4);

        let err = read_notes(SHT_NOTE, &bytes, ByteOrder::Little);
        assert_eq!(err, Err(DecodeError::Truncated("desc")));
    }

    #[test]
    fn oversized_descsize_is_malformed() {
        let bytes = NoteBuilder::new(ByteOrder::Little)
            .raw_header(5, 0x8000_0000, NT_PRSTATUS)
            .build();

        let err = read_notes(SHT_NOTE, &bytes, ByteOrder::Little);
        assert_eq!(
            err,
            Err(DecodeError::MalformedLength {
                field: "descsize",
                value: 0x8000_0000
            })
        );
    }

    #[test]
    fn by_type_matches_the_filtered_full_decode() {
        let bytes = NoteBuilder::new(ByteOrder::Little)
            .note("CORE", NT_PRPSINFO, &[9; 8])
            .note("CORE", NT_PRSTATUS, &[1; 12])
            .note("CORE", NT_PRSTATUS, &[2; 12])
            .build();

        let all = read_notes(SHT_NOTE, &bytes, ByteOrder::Little).unwrap();
        for search in [NT_PRPSINFO, NT_PRSTATUS] {
            let found = read_note_by_type(SHT_NOTE, &bytes, ByteOrder::Little, search)
                .unwrap()
                .unwrap();
            let first = all.iter().find(|n| n.ntype == search).unwrap();
            assert_eq!(&found, first);
        }
    }

    #[test]
    fn by_type_returns_none_when_absent() {
        let bytes = NoteBuilder::new(ByteOrder::Little)
            .note("CORE", NT_PRPSINFO, &[9; 8])
            .note("GNU", 0x10, &[1, 2, 3])
            .build();

        let found = read_note_by_type(SHT_NOTE, &bytes, ByteOrder::Little, NT_PRSTATUS).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn name_trimming_strips_trailing_nuls() {
        let mut name = Vec::from(*b"prog");
        name.resize(16, 0);
        assert_eq!(nul_trimmed_string(&name), "prog");
        assert_eq!(nul_trimmed_string(&[0; 16]), "");
        assert_eq!(nul_trimmed_string(b"full"), "full");
    }

    #[test]
    fn unknown_types_fall_back_to_lower_neighbor_or_hex() {
        assert_eq!(note_type_name(0x1), "NT_PRSTATUS");
        assert_eq!(note_type_name(0x202), "NT_X86_XSTATE");
        assert_eq!(note_type_name(0x203), "NT_X86_XSTATE+1");
        assert_eq!(note_type_name(0x410), "NT_ARM_SYSTEM_CALL+12");
        assert_eq!(note_type_name(0x0), "0x0");
    }
}

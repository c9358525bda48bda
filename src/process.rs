//! Wrapper around an opened ELF file. The structural walk (header,
//! section/segment tables, symbols) comes from the `elf` crate; this layer
//! finds the note regions and hands their raw bytes to the decoders in
//! `crate::notes` along with the byte order and class from the header.
use crate::notes::{
    self, ByteOrder, Class, Note, PrPsInfo, PrStatus, read_prpsinfo, read_prstatus,
};
use anyhow::{Context, Result};
use elf::ElfBytes;
use elf::abi;
use elf::endian::AnyEndian;

pub struct Process<'data> {
    pub file: ElfBytes<'data, AnyEndian>,
    pub order: ByteOrder,
    pub class: Class,
}

impl<'data> Process<'data> {
    pub fn parse(data: &'data [u8]) -> Result<Self> {
        let file =
            ElfBytes::<AnyEndian>::minimal_parse(data).context("not a valid ELF file")?;
        // EI_CLASS ident byte; minimal_parse has already vetted the magic.
        let class = Class::from_ident(data.get(4).copied().unwrap_or(0))?;
        let order = match file.ehdr.endianness {
            AnyEndian::Little => ByteOrder::Little,
            AnyEndian::Big => ByteOrder::Big,
        };
        Ok(Process { file, order, class })
    }

    /// Raw bytes of every note region in the file. Binaries keep notes in
    /// SHT_NOTE sections; core files usually have no section table at all
    /// and carry them in PT_NOTE segments instead.
    fn note_regions(&self) -> Vec<&'data [u8]> {
        let mut regions = Vec::new();
        if let Some(sections) = self.file.section_headers() {
            for shdr in sections.iter() {
                if shdr.sh_type == abi::SHT_NOTE {
                    match self.file.section_data(&shdr) {
                        Ok((data, None)) => regions.push(data),
                        Ok((_, Some(_))) => log::warn!("skipping compressed note section"),
                        Err(e) => log::warn!("skipping unreadable note section: {e}"),
                    }
                }
            }
        }
        if regions.is_empty()
            && let Some(segments) = self.file.segments()
        {
            for phdr in segments.iter() {
                if phdr.p_type == abi::PT_NOTE {
                    match self.file.segment_data(&phdr) {
                        Ok(data) => regions.push(data),
                        Err(e) => log::warn!("skipping unreadable note segment: {e}"),
                    }
                }
            }
        }
        regions
    }

    pub fn notes(&self) -> Result<Vec<Note>> {
        let mut all = Vec::new();
        for region in self.note_regions() {
            all.extend(notes::read_notes(abi::SHT_NOTE, region, self.order)?);
        }
        Ok(all)
    }

    /// First note of the given type across all note regions.
    pub fn find_note(&self, ntype: u32) -> Result<Option<Note>> {
        for region in self.note_regions() {
            if let Some(note) =
                notes::read_note_by_type(abi::SHT_NOTE, region, self.order, ntype)?
            {
                return Ok(Some(note));
            }
        }
        Ok(None)
    }

    pub fn prstatus(&self) -> Result<Option<PrStatus>> {
        match self.find_note(notes::NT_PRSTATUS)? {
            Some(note) => Ok(Some(read_prstatus(&note, self.order, self.class)?)),
            None => Ok(None),
        }
    }

    pub fn prpsinfo(&self) -> Result<Option<PrPsInfo>> {
        match self.find_note(notes::NT_PRPSINFO)? {
            Some(note) => Ok(Some(read_prpsinfo(&note, self.order, self.class)?)),
            None => Ok(None),
        }
    }
}

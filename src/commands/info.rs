//! The table printers behind each command line flag.
use super::tables::{SimpleTableBuilder, TableBuilder, add_field, add_simple};
use crate::notes::{NT_GO_BUILD, TimeVal};
use crate::process::Process;
use anyhow::Result;
use elf::abi;
use elf::to_str;

fn sh_type_name(value: u32) -> String {
    to_str::sh_type_to_str(value)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{value:#x}"))
}

fn p_type_name(value: u32) -> String {
    to_str::p_type_to_str(value)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{value:#x}"))
}

fn section_flags(flags: u64) -> String {
    const NAMES: &[(u64, &str)] = &[
        (abi::SHF_WRITE as u64, "WRITE"),
        (abi::SHF_ALLOC as u64, "ALLOC"),
        (abi::SHF_EXECINSTR as u64, "EXEC"),
        (abi::SHF_MERGE as u64, "MERGE"),
        (abi::SHF_STRINGS as u64, "STRINGS"),
        (abi::SHF_INFO_LINK as u64, "INFO"),
        (abi::SHF_LINK_ORDER as u64, "LINK"),
        (abi::SHF_GROUP as u64, "GROUP"),
        (abi::SHF_TLS as u64, "TLS"),
        (abi::SHF_COMPRESSED as u64, "COMPRESSED"),
    ];
    let mut result = Vec::new();
    for (bit, name) in NAMES {
        if flags & bit != 0 {
            result.push(*name);
        }
    }
    if result.is_empty() {
        result.push("none");
    }
    result.join(" ")
}

fn segment_flags(flags: u32) -> String {
    let r = if flags & abi::PF_R != 0 { 'r' } else { '-' };
    let w = if flags & abi::PF_W != 0 { 'w' } else { '-' };
    let x = if flags & abi::PF_X != 0 { 'x' } else { '-' };
    format!("{r}{w}{x}")
}

fn symbol_type_name(value: u8) -> String {
    match value {
        abi::STT_NOTYPE => "NOTYPE".to_string(),
        abi::STT_OBJECT => "OBJECT".to_string(),
        abi::STT_FUNC => "FUNC".to_string(),
        abi::STT_SECTION => "SECTION".to_string(),
        abi::STT_FILE => "FILE".to_string(),
        abi::STT_COMMON => "COMMON".to_string(),
        abi::STT_TLS => "TLS".to_string(),
        other => format!("{other:#x}"),
    }
}

fn symbol_bind_name(value: u8) -> String {
    match value {
        abi::STB_LOCAL => "LOCAL".to_string(),
        abi::STB_GLOBAL => "GLOBAL".to_string(),
        abi::STB_WEAK => "WEAK".to_string(),
        other => format!("{other:#x}"),
    }
}

fn symbol_section_name(shndx: u16) -> String {
    match shndx {
        abi::SHN_UNDEF => "UND".to_string(),
        abi::SHN_ABS => "ABS".to_string(),
        abi::SHN_COMMON => "COM".to_string(),
        other => format!("{other}"),
    }
}

fn timeval_str(tv: &TimeVal) -> String {
    format!("{}.{:06}s", tv.sec, tv.usec)
}

pub fn print_header(p: &Process) {
    let ehdr = &p.file.ehdr;
    let mut b = SimpleTableBuilder::new();
    add_simple!(b, "class", "{:?}", ehdr.class);
    add_simple!(b, "byte order", "{:?}", p.order);
    add_simple!(b, "version", ehdr.version);
    add_simple!(
        b,
        "osabi",
        to_str::e_osabi_to_str(ehdr.osabi)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:#x}", ehdr.osabi))
    );
    add_simple!(b, "abi version", ehdr.abiversion);
    add_simple!(
        b,
        "type",
        to_str::e_type_to_human_str(ehdr.e_type)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:#x}", ehdr.e_type))
    );
    add_simple!(
        b,
        "machine",
        to_str::e_machine_to_human_str(ehdr.e_machine)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:#x}", ehdr.e_machine))
    );
    add_simple!(b, "entry", "{:#x}", ehdr.e_entry);
    b.println();
}

pub fn print_sections(p: &Process) -> Result<()> {
    let (shdrs, strtab) = p.file.section_headers_with_strtab()?;
    let Some(shdrs) = shdrs else {
        println!("No sections (core files usually have none).");
        return Ok(());
    };

    let mut builder = TableBuilder::new();
    builder.add_col_r("Id");
    builder.add_col_l("Section");
    builder.add_col_l("Type");
    builder.add_col_l("Flags");
    builder.add_col_r("Addr");
    builder.add_col_r("Offset");
    builder.add_col_r("Size");
    builder.add_col_r("Link");
    builder.add_col_r("Info");
    builder.add_col_r("Align");
    builder.add_col_r("Entsize");

    for (id, shdr) in shdrs.iter().enumerate() {
        let name = strtab
            .as_ref()
            .and_then(|t| t.get(shdr.sh_name as usize).ok())
            .unwrap_or("?");
        add_field!(builder, "Id", id);
        add_field!(builder, "Section", name);
        add_field!(builder, "Type", sh_type_name(shdr.sh_type));
        add_field!(builder, "Flags", section_flags(shdr.sh_flags));
        add_field!(builder, "Addr", "{:x}", shdr.sh_addr);
        add_field!(builder, "Offset", "{:x}", shdr.sh_offset);
        add_field!(builder, "Size", "{:x}", shdr.sh_size);
        add_field!(builder, "Link", shdr.sh_link);
        add_field!(builder, "Info", shdr.sh_info);
        add_field!(builder, "Align", shdr.sh_addralign);
        add_field!(builder, "Entsize", shdr.sh_entsize);
    }
    builder.println();
    Ok(())
}

pub fn print_progs(p: &Process) {
    let Some(segments) = p.file.segments() else {
        println!("No program headers.");
        return;
    };

    let mut builder = TableBuilder::new();
    builder.add_col_l("Type");
    builder.add_col_l("Flags");
    builder.add_col_r("Offset");
    builder.add_col_r("Vaddr");
    builder.add_col_r("Paddr");
    builder.add_col_r("Filesz");
    builder.add_col_r("Memsz");
    builder.add_col_r("Align");

    for phdr in segments.iter() {
        add_field!(builder, "Type", p_type_name(phdr.p_type));
        add_field!(builder, "Flags", segment_flags(phdr.p_flags));
        add_field!(builder, "Offset", "{:x}", phdr.p_offset);
        add_field!(builder, "Vaddr", "{:x}", phdr.p_vaddr);
        add_field!(builder, "Paddr", "{:x}", phdr.p_paddr);
        add_field!(builder, "Filesz", "{:x}", phdr.p_filesz);
        add_field!(builder, "Memsz", "{:x}", phdr.p_memsz);
        add_field!(builder, "Align", "{:x}", phdr.p_align);
    }
    builder.println();
}

pub fn print_symbols(p: &Process) -> Result<()> {
    let Some((symbols, strtab)) = p.file.symbol_table()? else {
        println!("No symbol table.");
        return Ok(());
    };

    let mut builder = TableBuilder::new();
    builder.add_col_l("Sym");
    builder.add_col_l("Type");
    builder.add_col_l("Bind");
    builder.add_col_r("Section");
    builder.add_col_r("Value");
    builder.add_col_r("Size");

    for sym in symbols.iter() {
        let name = strtab.get(sym.st_name as usize).unwrap_or("?");
        add_field!(builder, "Sym", name);
        add_field!(builder, "Type", symbol_type_name(sym.st_symtype()));
        add_field!(builder, "Bind", symbol_bind_name(sym.st_bind()));
        add_field!(builder, "Section", symbol_section_name(sym.st_shndx));
        add_field!(builder, "Value", "{:x}", sym.st_value);
        add_field!(builder, "Size", sym.st_size);
    }
    builder.println();
    Ok(())
}

/// Undefined dynamic symbols plus the DT_NEEDED libraries.
pub fn print_imports(p: &Process) -> Result<()> {
    let Some((symbols, strtab)) = p.file.dynamic_symbol_table()? else {
        println!("No dynamic symbol table.");
        return Ok(());
    };

    let mut builder = TableBuilder::new();
    builder.add_col_l("Imported Symbol");
    builder.add_col_l("Type");
    builder.add_col_l("Bind");

    for sym in symbols.iter() {
        if !sym.is_undefined() {
            continue;
        }
        let name = strtab.get(sym.st_name as usize).unwrap_or("?");
        if name.is_empty() {
            continue;
        }
        add_field!(builder, "Imported Symbol", name);
        add_field!(builder, "Type", symbol_type_name(sym.st_symtype()));
        add_field!(builder, "Bind", symbol_bind_name(sym.st_bind()));
    }
    builder.println();

    if let Some(dynamic) = p.file.dynamic()? {
        let mut builder = TableBuilder::new();
        builder.add_col_l("Library");
        for d in dynamic.iter() {
            if d.d_tag == abi::DT_NEEDED {
                // DT_NEEDED values index the same string table as .dynsym
                let name = strtab.get(d.d_val() as usize).unwrap_or("?");
                add_field!(builder, "Library", name);
            }
        }
        builder.println();
    }
    Ok(())
}

pub fn print_notes(p: &Process) -> Result<()> {
    let notes = p.notes()?;

    let mut builder = TableBuilder::new();
    builder.add_col_l("Note");
    builder.add_col_l("Type");
    builder.add_col_r("Size");
    builder.add_col_l("Data");

    for note in &notes {
        let mut type_name = note.type_name();
        let mut data = "...".to_string();
        if note.name == "Go" && note.ntype == NT_GO_BUILD {
            type_name = "NT_GOBUILDID".to_string();
            data = String::from_utf8_lossy(&note.data).into_owned();
        }
        add_field!(builder, "Note", note.name);
        add_field!(builder, "Type", type_name);
        add_field!(builder, "Size", "{:#x}", note.data.len());
        add_field!(builder, "Data", data);
    }
    builder.println();
    Ok(())
}

pub fn print_prstatus(p: &Process) -> Result<()> {
    let Some(status) = p.prstatus()? else {
        println!("No NT_PRSTATUS note found.");
        return Ok(());
    };

    let mut b = SimpleTableBuilder::new();
    add_simple!(b, "sig", status.info.signal);
    add_simple!(b, "code", status.info.code);
    add_simple!(b, "errno", status.info.errno);
    add_simple!(b, "cursig", status.cursig);
    add_simple!(b, "sigpend", "{:#x}", status.sigpend);
    add_simple!(b, "sighold", "{:#x}", status.sighold);
    add_simple!(b, "pid", status.pid);
    add_simple!(b, "ppid", status.ppid);
    add_simple!(b, "pgrp", status.pgrp);
    add_simple!(b, "sid", status.sid);
    add_simple!(b, "utime", timeval_str(&status.utime));
    add_simple!(b, "stime", timeval_str(&status.stime));
    add_simple!(b, "cutime", timeval_str(&status.cutime));
    add_simple!(b, "cstime", timeval_str(&status.cstime));
    b.println();
    println!();

    let mut builder = TableBuilder::new();
    builder.add_col_l("Reg");
    builder.add_col_r("Hex");
    builder.add_col_r("Decimal");
    for (name, value) in status.user_regs().named() {
        add_field!(builder, "Reg", name);
        add_field!(builder, "Hex", "{:x}", value);
        add_field!(builder, "Decimal", value);
    }
    builder.println();
    Ok(())
}

pub fn print_prpsinfo(p: &Process) -> Result<()> {
    let Some(info) = p.prpsinfo()? else {
        println!("No NT_PRPSINFO note found.");
        return Ok(());
    };

    let mut b = SimpleTableBuilder::new();
    add_simple!(b, "state", info.state);
    add_simple!(b, "sname", info.sname);
    add_simple!(b, "zomb", info.zomb);
    add_simple!(b, "nice", info.nice);
    add_simple!(b, "flag", "{:#x}", info.flag);
    add_simple!(b, "uid", info.uid);
    add_simple!(b, "gid", info.gid);
    add_simple!(b, "pid", info.pid);
    add_simple!(b, "ppid", info.ppid);
    add_simple!(b, "pgrp", info.pgrp);
    add_simple!(b, "sid", info.sid);
    add_simple!(b, "fname", info.fname);
    add_simple!(b, "psargs", info.psargs);
    b.println();
    Ok(())
}

//! Decoder for the PRPSINFO note: the process metadata (state, ids, name,
//! argument list) the kernel captured at dump time. Layout is struct
//! elf_prpsinfo in include/uapi/linux/elfcore.h.
use super::{ByteOrder, Class, DecodeError, NT_PRPSINFO, Note, note::nul_trimmed_string};

/// Number of chars kept from the argument list.
pub const ELF_PRARGSZ: usize = 80;

/// Width of the executable-name field, from TASK_COMM_LEN. Exposed to
/// userspace, so it cannot change.
pub const ELF_PRFNAMESZ: usize = 16;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrPsInfo {
    /// Numeric process state.
    pub state: u8,

    /// Single-character code for the state, e.g. "R" or "Z".
    pub sname: String,

    /// Zombie flag.
    pub zomb: u8,

    /// Nice value.
    pub nice: i8,

    /// Process flags.
    pub flag: u64,

    pub uid: u32,
    pub gid: u32,

    pub pid: i32,
    pub ppid: i32,
    pub pgrp: i32,
    pub sid: i32,

    /// Filename of the executable, NUL trimmed.
    pub fname: String,

    /// Initial part of the argument list, NUL trimmed.
    pub psargs: String,
}

/// Decodes a PRPSINFO note. On 64-bit targets four padding bytes follow
/// the flag word before the uid; 32-bit layouts have no padding there.
pub fn read_prpsinfo(note: &Note, order: ByteOrder, class: Class) -> Result<PrPsInfo, DecodeError> {
    if note.ntype != NT_PRPSINFO {
        return Err(DecodeError::WrongNoteType {
            expected: NT_PRPSINFO,
            found: note.ntype,
        });
    }

    let mut s = note.open(order);
    let state = s.read_byte("state")?;
    let sname = (s.read_byte("sname")? as char).to_string();
    let zomb = s.read_byte("zomb")?;
    let nice = s.read_byte("nice")? as i8;

    let flag = s.read_ulong(class, "flag")?;
    if class == Class::Elf64 {
        s.skip(4);
    }

    let uid = s.read_uid(class, "uid")?;
    let gid = s.read_gid(class, "gid")?;

    let pid = s.read_pid("pid")?;
    let ppid = s.read_pid("ppid")?;
    let pgrp = s.read_pid("pgrp")?;
    let sid = s.read_pid("sid")?;

    let fname = nul_trimmed_string(s.read_bytes(ELF_PRFNAMESZ, "fname")?);
    let psargs = nul_trimmed_string(s.read_bytes(ELF_PRARGSZ, "psargs")?);

    Ok(PrPsInfo {
        state,
        sname,
        zomb,
        nice,
        flag,
        uid,
        gid,
        pid,
        ppid,
        pgrp,
        sid,
        fname,
        psargs,
    })
}

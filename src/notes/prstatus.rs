//! Decoder for the PRSTATUS note: the signal and scheduling state the
//! kernel captured for a thread, plus its general registers. Layout is
//! struct elf_prstatus in include/uapi/linux/elfcore.h.
use super::{
    ByteOrder, Class, DecodeError, ELF_NGREG, GRegSet, NT_PRSTATUS, Note, Stream, UserRegs,
};

/// The 3-field siginfo record at the head of PRSTATUS.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SigInfo {
    /// Signal number.
    pub signal: i32,

    /// Extra code, e.g. SEGV_MAPERR vs SEGV_ACCERR for a SIGSEGV.
    pub code: i32,

    /// If non-zero, the errno associated with the signal.
    pub errno: i32,
}

/// Seconds and microseconds. The note stores both as 64-bit words
/// regardless of class.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimeVal {
    pub sec: i64,
    pub usec: i64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PrStatus {
    pub info: SigInfo,

    /// Current signal, not necessarily the one that caused the dump.
    pub cursig: i16,

    /// Set of pending signals.
    pub sigpend: u64,

    /// Set of held signals.
    pub sighold: u64,

    pub pid: i32,
    pub ppid: i32,
    pub pgrp: i32,
    pub sid: i32,

    /// Time spent in user code.
    pub utime: TimeVal,

    /// Time spent in system code.
    pub stime: TimeVal,

    pub cutime: TimeVal,
    pub cstime: TimeVal,

    /// General registers as the flat array from the note.
    pub regs: GRegSet,
}

impl PrStatus {
    /// The registers under their per-architecture names.
    pub fn user_regs(&self) -> UserRegs {
        UserRegs::from_greg_set(&self.regs)
    }
}

fn read_timeval(
    s: &mut Stream,
    sec_field: &'static str,
    usec_field: &'static str,
) -> Result<TimeVal, DecodeError> {
    Ok(TimeVal {
        sec: s.read_sxword(sec_field)?,
        usec: s.read_sxword(usec_field)?,
    })
}

/// Decodes a PRSTATUS note. `class` controls the width of sigpend/sighold
/// and of each register word; the pid family is fixed 32-bit per the
/// kernel ABI.
pub fn read_prstatus(note: &Note, order: ByteOrder, class: Class) -> Result<PrStatus, DecodeError> {
    if note.ntype != NT_PRSTATUS {
        return Err(DecodeError::WrongNoteType {
            expected: NT_PRSTATUS,
            found: note.ntype,
        });
    }

    let mut s = note.open(order);
    let info = SigInfo {
        signal: s.read_int("sig")?,
        code: s.read_int("code")?,
        errno: s.read_int("errno")?,
    };

    let cursig = s.read_half("cursig")? as i16;
    s.skip(2); // realign to 4

    let sigpend = s.read_ulong(class, "sigpend")?;
    let sighold = s.read_ulong(class, "sighold")?;

    let pid = s.read_pid("pid")?;
    let ppid = s.read_pid("ppid")?;
    let pgrp = s.read_pid("pgrp")?;
    let sid = s.read_pid("sid")?;

    let utime = read_timeval(&mut s, "utime.sec", "utime.usec")?;
    let stime = read_timeval(&mut s, "stime.sec", "stime.usec")?;
    let cutime = read_timeval(&mut s, "cutime.sec", "cutime.usec")?;
    let cstime = read_timeval(&mut s, "cstime.sec", "cstime.usec")?;

    let mut regs: GRegSet = [0; ELF_NGREG];
    for reg in regs.iter_mut() {
        *reg = match class {
            Class::Elf64 => s.read_xword("reg")?,
            Class::Elf32 => s.read_word("reg")? as u64,
        };
    }

    Ok(PrStatus {
        info,
        cursig,
        sigpend,
        sighold,
        pid,
        ppid,
        pgrp,
        sid,
        utime,
        stime,
        cutime,
        cstime,
        regs,
    })
}

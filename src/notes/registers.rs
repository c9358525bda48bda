//! The general-register block captured in a PRSTATUS note. The note stores
//! a flat array of machine words; `UserRegs` gives the same values
//! per-register names by positional assignment.

/// Number of general registers in the register set, derived from the named
/// register struct so the two cannot drift apart.
pub const ELF_NGREG: usize = size_of::<UserRegs>() / size_of::<u64>();

/// The flat register array as decoded from the note, widened to u64.
pub type GRegSet = [u64; ELF_NGREG];

/// x86-64 user-mode registers in ptrace order, see struct user_regs_struct
/// in arch/x86/include/asm/user_64.h. Field declaration order matches the
/// array index order in the note.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct UserRegs {
    pub r15: u64,
    pub r14: u64,
    pub r13: u64,
    pub r12: u64,
    pub bp: u64,
    pub bx: u64,
    pub r11: u64,
    pub r10: u64,
    pub r9: u64,
    pub r8: u64,
    pub ax: u64,
    pub cx: u64,
    pub dx: u64,
    pub si: u64,
    pub di: u64,
    pub orig_ax: u64,
    pub ip: u64,
    pub cs: u64,
    pub flags: u64,
    pub sp: u64,
    pub ss: u64,
    pub fs_base: u64,
    pub gs_base: u64,
    pub ds: u64,
    pub es: u64,
    pub fs: u64,
    pub gs: u64,
}

// The decoder reads exactly this many register words per thread.
const _: () = assert!(ELF_NGREG == 27);

impl UserRegs {
    /// Names register array slot i with the i-th field, in declaration order.
    pub fn from_greg_set(set: &GRegSet) -> UserRegs {
        UserRegs {
            r15: set[0],
            r14: set[1],
            r13: set[2],
            r12: set[3],
            bp: set[4],
            bx: set[5],
            r11: set[6],
            r10: set[7],
            r9: set[8],
            r8: set[9],
            ax: set[10],
            cx: set[11],
            dx: set[12],
            si: set[13],
            di: set[14],
            orig_ax: set[15],
            ip: set[16],
            cs: set[17],
            flags: set[18],
            sp: set[19],
            ss: set[20],
            fs_base: set[21],
            gs_base: set[22],
            ds: set[23],
            es: set[24],
            fs: set[25],
            gs: set[26],
        }
    }

    /// The registers as (name, value) pairs, in the same order.
    pub fn named(&self) -> [(&'static str, u64); ELF_NGREG] {
        [
            ("r15", self.r15),
            ("r14", self.r14),
            ("r13", self.r13),
            ("r12", self.r12),
            ("rbp", self.bp),
            ("rbx", self.bx),
            ("r11", self.r11),
            ("r10", self.r10),
            ("r9", self.r9),
            ("r8", self.r8),
            ("rax", self.ax),
            ("rcx", self.cx),
            ("rdx", self.dx),
            ("rsi", self.si),
            ("rdi", self.di),
            ("orig_rax", self.orig_ax),
            ("rip", self.ip),
            ("cs", self.cs),
            ("eflags", self.flags),
            ("rsp", self.sp),
            ("ss", self.ss),
            ("fs_base", self.fs_base),
            ("gs_base", self.gs_base),
            ("ds", self.ds),
            ("es", self.es),
            ("fs", self.fs),
            ("gs", self.gs),
        ]
    }
}

//! Static MOS 6502 opcode table.
//!
//! Maps every one of the 256 opcode byte values to a mnemonic, an addressing
//! mode, and an undocumented-opcode flag. The table is total: no byte value
//! is "unknown". Undocumented opcodes keep their lower-case mnemonics so that
//! disassembly output and feature vectors stay compatible with models trained
//! against earlier versions of this table.

use std::fmt;

/// Operand encoding schemes of the MOS 6502.
///
/// Each mode fixes the operand byte length and the text rendering of the
/// operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// `#$XX` — operand is a literal byte.
    Immediate,
    /// `$XXXX` — 16-bit little-endian address.
    Absolute,
    /// `$XX` — address in the zero page.
    ZeroPage,
    /// Operates on the accumulator, no operand bytes.
    Accumulator,
    /// No operand bytes.
    Implied,
    /// `($XX,X)` — zero-page pointer indexed by X before the fetch.
    IndexedIndirect,
    /// `($XX),Y` — zero-page pointer, Y added after the fetch.
    IndirectIndexed,
    /// `$XX,X`
    ZeroPageX,
    /// `$XX,Y`
    ZeroPageY,
    /// `$XXXX,X`
    AbsoluteX,
    /// `$XXXX,Y`
    AbsoluteY,
    /// Signed 8-bit displacement from the following instruction.
    Relative,
    /// `($XXXX)` — 16-bit pointer, only used by JMP.
    Indirect,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode byte.
    pub fn operand_len(self) -> usize {
        match self {
            AddressingMode::Accumulator | AddressingMode::Implied => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::IndexedIndirect
            | AddressingMode::IndirectIndexed
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressingMode::Immediate => "immediate",
            AddressingMode::Absolute => "absolute",
            AddressingMode::ZeroPage => "zero-page",
            AddressingMode::Accumulator => "accumulator",
            AddressingMode::Implied => "implied",
            AddressingMode::IndexedIndirect => "(zp,X)",
            AddressingMode::IndirectIndexed => "(zp),Y",
            AddressingMode::ZeroPageX => "zero-page,X",
            AddressingMode::ZeroPageY => "zero-page,Y",
            AddressingMode::AbsoluteX => "absolute,X",
            AddressingMode::AbsoluteY => "absolute,Y",
            AddressingMode::Relative => "relative",
            AddressingMode::Indirect => "indirect",
        };
        write!(f, "{}", name)
    }
}

/// One entry of the opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    /// Mnemonic as printed in disassembly. Lower case for undocumented ops.
    pub mnemonic: &'static str,
    /// Operand encoding.
    pub mode: AddressingMode,
    /// True for undocumented/unstable opcodes.
    pub illegal: bool,
}

const fn op(mnemonic: &'static str, mode: AddressingMode) -> Opcode {
    Opcode {
        mnemonic,
        mode,
        illegal: false,
    }
}

const fn ill(mnemonic: &'static str, mode: AddressingMode) -> Opcode {
    Opcode {
        mnemonic,
        mode,
        illegal: true,
    }
}

/// The full opcode table, indexed by opcode byte.
#[rustfmt::skip]
pub static OPCODES: [Opcode; 256] = {
    use AddressingMode::*;
    [
        op("BRK", Implied),          // 00
        op("ORA", IndexedIndirect),  // 01
        ill("kil", Implied),         // 02
        ill("slo", IndirectIndexed), // 03
        ill("dop", ZeroPage),        // 04
        op("ORA", ZeroPage),         // 05
        op("ASL", ZeroPage),         // 06
        ill("slo", ZeroPage),        // 07
        op("PHP", Implied),          // 08
        op("ORA", Immediate),        // 09
        op("ASL", Accumulator),      // 0A
        ill("aac", Immediate),       // 0B
        ill("top", Absolute),        // 0C
        op("ORA", Absolute),         // 0D
        op("ASL", Absolute),         // 0E
        ill("slo", Absolute),        // 0F
        op("BPL", Relative),         // 10
        op("ORA", IndirectIndexed),  // 11
        ill("kil", Implied),         // 12
        ill("slo", IndexedIndirect), // 13
        ill("dop", ZeroPageX),       // 14
        op("ORA", ZeroPageX),        // 15
        op("ASL", ZeroPageX),        // 16
        ill("slo", ZeroPageX),       // 17
        op("CLC", Implied),          // 18
        op("ORA", AbsoluteY),        // 19
        ill("nop", Implied),         // 1A
        ill("slo", AbsoluteY),       // 1B
        ill("top", AbsoluteX),       // 1C
        op("ORA", AbsoluteX),        // 1D
        op("ASL", AbsoluteX),        // 1E
        ill("slo", AbsoluteX),       // 1F
        op("JSR", Absolute),         // 20
        op("AND", IndexedIndirect),  // 21
        ill("kil", Implied),         // 22
        ill("rla", IndexedIndirect), // 23
        op("BIT", ZeroPage),         // 24
        op("AND", ZeroPage),         // 25
        op("ROL", ZeroPage),         // 26
        ill("rla", ZeroPage),        // 27
        op("PLP", Implied),          // 28
        op("AND", Immediate),        // 29
        op("ROL", Accumulator),      // 2A
        ill("aac", Immediate),       // 2B
        op("BIT", Absolute),         // 2C
        op("AND", Absolute),         // 2D
        op("ROL", Absolute),         // 2E
        ill("rla", Absolute),        // 2F
        op("BMI", Relative),         // 30
        op("AND", IndirectIndexed),  // 31
        ill("kil", Implied),         // 32
        ill("rla", IndirectIndexed), // 33
        ill("dop", ZeroPageX),       // 34
        op("AND", ZeroPageX),        // 35
        op("ROL", ZeroPageX),        // 36
        ill("rla", ZeroPageX),       // 37
        op("SEC", Implied),          // 38
        op("AND", AbsoluteY),        // 39
        ill("nop", Implied),         // 3A
        ill("rla", AbsoluteY),       // 3B
        ill("top", AbsoluteX),       // 3C
        op("AND", AbsoluteX),        // 3D
        op("ROL", AbsoluteX),        // 3E
        ill("rla", AbsoluteX),       // 3F
        op("RTI", Implied),          // 40
        op("EOR", IndexedIndirect),  // 41
        ill("kil", Implied),         // 42
        ill("sre", IndexedIndirect), // 43
        ill("dop", ZeroPage),        // 44
        op("EOR", ZeroPage),         // 45
        op("LSR", ZeroPage),         // 46
        ill("sre", ZeroPage),        // 47
        op("PHA", Implied),          // 48
        op("EOR", Immediate),        // 49
        op("LSR", Accumulator),      // 4A
        ill("asr", Immediate),       // 4B
        op("JMP", Absolute),         // 4C
        op("EOR", Absolute),         // 4D
        op("LSR", Absolute),         // 4E
        ill("sre", Absolute),        // 4F
        op("BVC", Relative),         // 50
        op("EOR", IndirectIndexed),  // 51
        ill("kil", Implied),         // 52
        ill("sre", IndirectIndexed), // 53
        ill("dop", ZeroPageX),       // 54
        op("EOR", ZeroPageX),        // 55
        op("LSR", ZeroPageX),        // 56
        ill("sre", ZeroPageX),       // 57
        op("CLI", Implied),          // 58
        op("EOR", AbsoluteY),        // 59
        ill("nop", Implied),         // 5A
        ill("sre", AbsoluteY),       // 5B
        ill("top", AbsoluteX),       // 5C
        op("EOR", AbsoluteX),        // 5D
        op("LSR", AbsoluteX),        // 5E
        ill("sre", AbsoluteX),       // 5F
        op("RTS", Implied),          // 60
        op("ADC", IndexedIndirect),  // 61
        ill("kil", Implied),         // 62
        ill("rra", IndexedIndirect), // 63
        ill("dop", ZeroPage),        // 64
        op("ADC", ZeroPage),         // 65
        op("ROR", ZeroPage),         // 66
        ill("rra", ZeroPage),        // 67
        op("PLA", Implied),          // 68
        op("ADC", Immediate),        // 69
        op("ROR", Accumulator),      // 6A
        ill("arr", Immediate),       // 6B
        op("JMP", Indirect),         // 6C
        op("ADC", Absolute),         // 6D
        op("ROR", Absolute),         // 6E
        ill("rra", Absolute),        // 6F
        op("BVS", Relative),         // 70
        op("ADC", IndirectIndexed),  // 71
        ill("kil", Implied),         // 72
        ill("rra", IndirectIndexed), // 73
        ill("dop", ZeroPageX),       // 74
        op("ADC", ZeroPageX),        // 75
        op("ROR", ZeroPageX),        // 76
        ill("rra", ZeroPageX),       // 77
        op("SEI", Implied),          // 78
        op("ADC", AbsoluteY),        // 79
        ill("nop", Implied),         // 7A
        ill("rra", AbsoluteY),       // 7B
        ill("top", AbsoluteX),       // 7C
        op("ADC", AbsoluteX),        // 7D
        op("ROR", AbsoluteX),        // 7E
        ill("rra", AbsoluteX),       // 7F
        ill("dop", Immediate),       // 80
        op("STA", IndexedIndirect),  // 81
        ill("dop", Immediate),       // 82
        ill("aax", IndexedIndirect), // 83
        op("STY", ZeroPage),         // 84
        op("STA", ZeroPage),         // 85
        op("STX", ZeroPage),         // 86
        ill("aax", ZeroPage),        // 87
        op("DEY", Implied),          // 88
        ill("dop", Immediate),       // 89
        op("TXA", Implied),          // 8A
        ill("xaa", Immediate),       // 8B
        op("STY", Absolute),         // 8C
        op("STA", Absolute),         // 8D
        op("STX", Absolute),         // 8E
        ill("aax", Absolute),        // 8F
        op("BCC", Relative),         // 90
        op("STA", IndirectIndexed),  // 91
        ill("kil", Implied),         // 92
        ill("axa", IndirectIndexed), // 93
        op("STY", ZeroPageX),        // 94
        op("STA", ZeroPageX),        // 95
        op("STX", ZeroPageY),        // 96
        ill("aax", ZeroPageY),       // 97
        op("TYA", Implied),          // 98
        op("STA", AbsoluteY),        // 99
        op("TXS", Implied),          // 9A
        ill("xas", AbsoluteY),       // 9B
        ill("sya", AbsoluteX),       // 9C
        op("STA", AbsoluteX),        // 9D
        ill("sxa", AbsoluteY),       // 9E
        ill("axa", AbsoluteY),       // 9F
        op("LDY", Immediate),        // A0
        op("LDA", IndexedIndirect),  // A1
        op("LDX", Immediate),        // A2
        ill("lax", IndexedIndirect), // A3
        op("LDY", ZeroPage),         // A4
        op("LDA", ZeroPage),         // A5
        op("LDX", ZeroPage),         // A6
        ill("lax", ZeroPage),        // A7
        op("TAY", Implied),          // A8
        op("LDA", Immediate),        // A9
        op("TAX", Implied),          // AA
        ill("atx", Implied),         // AB
        op("LDY", Absolute),         // AC
        op("LDA", Absolute),         // AD
        op("LDX", Absolute),         // AE
        ill("lax", Absolute),        // AF
        op("BCS", Relative),         // B0
        op("LDA", IndirectIndexed),  // B1
        ill("kil", Implied),         // B2
        ill("lax", IndirectIndexed), // B3
        op("LDY", ZeroPageX),        // B4
        op("LDA", ZeroPageX),        // B5
        op("LDX", ZeroPageY),        // B6
        ill("lax", ZeroPageY),       // B7
        op("CLV", Implied),          // B8
        op("LDA", AbsoluteY),        // B9
        op("TSX", Implied),          // BA
        ill("lar", AbsoluteY),       // BB
        op("LDY", AbsoluteX),        // BC
        op("LDA", AbsoluteX),        // BD
        op("LDX", AbsoluteY),        // BE
        ill("lax", AbsoluteY),       // BF
        op("CPY", Immediate),        // C0
        op("CMP", IndexedIndirect),  // C1
        ill("dop", Immediate),       // C2
        ill("dcp", IndexedIndirect), // C3
        op("CPY", ZeroPage),         // C4
        op("CMP", ZeroPage),         // C5
        op("DEC", ZeroPage),         // C6
        ill("dcp", ZeroPage),        // C7
        op("INY", Implied),          // C8
        op("CMP", Immediate),        // C9
        op("DEX", Implied),          // CA
        ill("axs", Immediate),       // CB
        op("CPY", Absolute),         // CC
        op("CMP", Absolute),         // CD
        op("DEC", Absolute),         // CE
        ill("dcp", Absolute),        // CF
        op("BNE", Relative),         // D0
        op("CMP", IndirectIndexed),  // D1
        ill("kil", Implied),         // D2
        ill("dcp", IndirectIndexed), // D3
        ill("dop", ZeroPageX),       // D4
        op("CMP", ZeroPageX),        // D5
        op("DEC", ZeroPageX),        // D6
        ill("dcp", ZeroPageX),       // D7
        op("CLD", Implied),          // D8
        op("CMP", AbsoluteY),        // D9
        ill("nop", Implied),         // DA
        ill("dcp", AbsoluteY),       // DB
        ill("top", AbsoluteX),       // DC
        op("CMP", AbsoluteX),        // DD
        op("DEC", AbsoluteX),        // DE
        ill("dcp", AbsoluteX),       // DF
        op("CPX", Immediate),        // E0
        op("SBC", IndexedIndirect),  // E1
        ill("dop", Immediate),       // E2
        ill("isc", IndexedIndirect), // E3
        op("CPX", ZeroPage),         // E4
        op("SBC", ZeroPage),         // E5
        op("INC", ZeroPage),         // E6
        ill("isc", ZeroPage),        // E7
        op("INX", Implied),          // E8
        op("SBC", Immediate),        // E9
        op("NOP", Implied),          // EA
        ill("sbc", Immediate),       // EB
        op("CPX", Absolute),         // EC
        op("SBC", Absolute),         // ED
        op("INC", Absolute),         // EE
        ill("isc", Absolute),        // EF
        op("BEQ", Relative),         // F0
        op("SBC", IndirectIndexed),  // F1
        ill("kil", Implied),         // F2
        ill("isc", IndirectIndexed), // F3
        ill("dop", ZeroPageX),       // F4
        op("SBC", ZeroPageX),        // F5
        op("INC", ZeroPageX),        // F6
        ill("isc", ZeroPageX),       // F7
        op("SED", Implied),          // F8
        op("SBC", AbsoluteY),        // F9
        ill("nop", Implied),         // FA
        ill("isc", AbsoluteY),       // FB
        ill("top", AbsoluteX),       // FC
        op("SBC", AbsoluteX),        // FD
        op("INC", AbsoluteX),        // FE
        ill("isc", AbsoluteX),       // FF
    ]
};

/// Resolve an opcode byte. Total over the whole input domain.
pub fn lookup(byte: u8) -> &'static Opcode {
    &OPCODES[byte as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_total() {
        for byte in 0..=255u8 {
            let entry = lookup(byte);
            assert!(!entry.mnemonic.is_empty(), "opcode {:02X} has no mnemonic", byte);
        }
    }

    #[test]
    fn test_illegal_flag_matches_mnemonic_case() {
        // The source convention encodes illegality as a lower-case mnemonic.
        for byte in 0..=255u8 {
            let entry = lookup(byte);
            let lower = entry.mnemonic.chars().next().unwrap().is_lowercase();
            assert_eq!(entry.illegal, lower, "opcode {:02X}", byte);
        }
    }

    #[test]
    fn test_known_entries() {
        assert_eq!(lookup(0xEA).mnemonic, "NOP");
        assert_eq!(lookup(0xEA).mode, AddressingMode::Implied);
        assert!(!lookup(0xEA).illegal);

        assert_eq!(lookup(0xA9).mnemonic, "LDA");
        assert_eq!(lookup(0xA9).mode, AddressingMode::Immediate);

        assert_eq!(lookup(0x6C).mnemonic, "JMP");
        assert_eq!(lookup(0x6C).mode, AddressingMode::Indirect);

        assert_eq!(lookup(0x10).mnemonic, "BPL");
        assert_eq!(lookup(0x10).mode, AddressingMode::Relative);

        // Undocumented single-byte NOP variant.
        assert_eq!(lookup(0x1A).mnemonic, "nop");
        assert!(lookup(0x1A).illegal);
    }

    #[test]
    fn test_operand_lengths() {
        assert_eq!(AddressingMode::Implied.operand_len(), 0);
        assert_eq!(AddressingMode::Accumulator.operand_len(), 0);
        assert_eq!(AddressingMode::Immediate.operand_len(), 1);
        assert_eq!(AddressingMode::Relative.operand_len(), 1);
        assert_eq!(AddressingMode::Absolute.operand_len(), 2);
        assert_eq!(AddressingMode::Indirect.operand_len(), 2);
    }
}

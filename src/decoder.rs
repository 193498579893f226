//! Streaming 6502 instruction decoder.
//!
//! Walks a raw byte buffer and emits one [`Instruction`] per opcode, with the
//! operand rendered according to the addressing mode. The loop stops two
//! bytes before the end of the requested range so that a two-byte operand can
//! always be read; callers that want the tail decoded must supply a buffer
//! with at least two trailing zero bytes past the logical data length (see
//! [`padded`]).

use std::fmt;

use crate::opcodes::{lookup, AddressingMode};

/// Number of zero bytes callers must guarantee past the logical data length.
pub const PAD_BYTES: usize = 2;

/// One decoded instruction.
///
/// Read-only once emitted. `address` is the load address plus the byte offset
/// of the opcode within the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Address of the opcode byte in the target address space.
    pub address: u16,
    /// Raw bytes spanned by this instruction, opcode first.
    pub bytes: Vec<u8>,
    /// Mnemonic from the opcode table.
    pub mnemonic: &'static str,
    /// Rendered operand, empty for implied/accumulator modes.
    pub operand: String,
    /// The opcode byte itself.
    pub opcode: u8,
    /// True for undocumented/unstable opcodes.
    pub illegal: bool,
}

impl Instruction {
    /// Mnemonic plus operand, e.g. `LDA #$05`.
    pub fn text(&self) -> String {
        if self.operand.is_empty() {
            self.mnemonic.to_string()
        } else {
            format!("{} {}", self.mnemonic, self.operand)
        }
    }

    /// Space-separated hex dump of the raw bytes, e.g. `4C 00 10`.
    pub fn raw_hex(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:04X}  {:<10} {}", self.address, self.raw_hex(), self.text())
    }
}

/// Returns a copy of `data` with the two trailing pad bytes appended.
pub fn padded(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + PAD_BYTES);
    out.extend_from_slice(data);
    out.extend_from_slice(&[0; PAD_BYTES]);
    out
}

/// Decode `length` bytes of `data` starting at `start`.
///
/// Emits instructions while the cursor is more than two bytes from
/// `start + length`; hitting that boundary stops decoding silently rather
/// than erroring. The effective end is clamped to the buffer length, so the
/// function never reads past `data` even if the caller overstates `length`.
pub fn decode(data: &[u8], load_address: u16, start: usize, length: usize) -> Vec<Instruction> {
    let end = start.saturating_add(length).min(data.len());
    let mut out = Vec::new();
    let mut pos = start;

    while pos + 2 < end {
        let opcode = data[pos];
        let entry = lookup(opcode);
        let first = pos;

        let operand = match entry.mode {
            AddressingMode::Immediate => {
                pos += 1;
                format!("#${:02X}", data[pos])
            }
            AddressingMode::Absolute => {
                let addr = u16::from_le_bytes([data[pos + 1], data[pos + 2]]);
                pos += 2;
                format!("${:04X}", addr)
            }
            AddressingMode::ZeroPage => {
                pos += 1;
                format!("${:02X}", data[pos])
            }
            AddressingMode::Accumulator | AddressingMode::Implied => String::new(),
            AddressingMode::IndexedIndirect => {
                pos += 1;
                format!("(${:02X},X)", data[pos])
            }
            AddressingMode::IndirectIndexed => {
                pos += 1;
                format!("(${:02X}),Y", data[pos])
            }
            AddressingMode::ZeroPageX => {
                pos += 1;
                format!("${:02X},X", data[pos])
            }
            AddressingMode::ZeroPageY => {
                pos += 1;
                format!("${:02X},Y", data[pos])
            }
            AddressingMode::AbsoluteX => {
                let addr = u16::from_le_bytes([data[pos + 1], data[pos + 2]]);
                pos += 2;
                format!("${:04X},X", addr)
            }
            AddressingMode::AbsoluteY => {
                let addr = u16::from_le_bytes([data[pos + 1], data[pos + 2]]);
                pos += 2;
                format!("${:04X},Y", addr)
            }
            AddressingMode::Relative => {
                pos += 1;
                let byte = data[pos];
                // Two's-complement sign extension over 8 bits.
                let disp = i32::from(byte & 0x7F) - i32::from(byte & 0x80);
                let target = pos as i32 + 1 + disp + i32::from(load_address);
                format!("${:04X} ({:+})", target as u16, disp)
            }
            AddressingMode::Indirect => {
                let addr = u16::from_le_bytes([data[pos + 1], data[pos + 2]]);
                pos += 2;
                format!("(${:04X})", addr)
            }
        };
        pos += 1;

        out.push(Instruction {
            address: load_address.wrapping_add(first as u16),
            bytes: data[first..pos].to_vec(),
            mnemonic: entry.mnemonic,
            operand,
            opcode,
            illegal: entry.illegal,
        });
    }

    out
}

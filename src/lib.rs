//! dis6502 - MOS 6502 Disassembler with Trainable Code/Data Classification
//!
//! This library disassembles raw 6502 binaries and classifies windows of the
//! result as code, data, or any operator-defined class, using a linear model
//! trained interactively from human feedback.
//!
//! # Features
//!
//! - **Complete Opcode Coverage**: All 256 opcode bytes decode, including
//!   undocumented/illegal instructions (rendered in lowercase)
//! - **Streaming Decoder**: Walks any byte window at any load address with
//!   rendered operands for all 13 addressing modes
//! - **Linear Classification**: Opcode-presence feature vectors scored by
//!   integer dot product against per-class weight vectors
//! - **Interactive Training**: Yes/No/Position feedback sessions that update
//!   a JSON-persisted model in place
//! - **Classification Maps**: Optional PGM images visualizing the per-window
//!   verdicts across a file
//!
//! # Quick Start
//!
//! ```rust
//! use dis6502::{disassemble, Model, classify_buffer};
//!
//! fn main() -> Result<(), dis6502::ClassifyError> {
//!     let program = [0xA9, 0x05, 0x4C, 0x00, 0x10];
//!
//!     // Plain disassembly at a load address.
//!     for insn in disassemble(&program, 0x1000) {
//!         println!("{}", insn);
//!     }
//!
//!     // Windowed classification with a fresh model.
//!     let model = Model::seeded();
//!     for window in classify_buffer(&model, &program, 0x1000)? {
//!         println!("{}: {} instructions", window.label, window.instructions.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]

pub mod classifier;
pub mod decoder;
pub mod error;
pub mod features;
pub mod grid;
pub mod model;
pub mod opcodes;
pub mod trainer;

pub use classifier::{classify, classify_buffer, Classification, LabeledWindow, BATCH_WINDOW};
pub use decoder::{decode, padded, Instruction, PAD_BYTES};
pub use error::{ClassifyError, Result};
pub use features::{FeatureVector, OPCODE_SPACE};
pub use model::Model;
pub use opcodes::{lookup, AddressingMode, Opcode};
pub use trainer::{TrainingSession, TRAINING_WINDOW};

/// Disassemble a whole buffer at `load_address`.
///
/// Pads the buffer internally so the final bytes decode; this is the
/// convenience entry point for callers that just want a listing.
pub fn disassemble(data: &[u8], load_address: u16) -> Vec<Instruction> {
    let buf = padded(data);
    decode(&buf, load_address, 0, buf.len())
}

/// Get version information for this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
    }

    #[test]
    fn test_disassemble_covers_whole_buffer() {
        let program = [0xA9, 0x05, 0x4C, 0x00, 0x10];
        let insns = disassemble(&program, 0x1000);

        assert_eq!(insns.len(), 2);
        assert_eq!(insns[0].text(), "LDA #$05");
        assert_eq!(insns[1].text(), "JMP $1000");
        let total: usize = insns.iter().map(|i| i.bytes.len()).sum();
        assert_eq!(total, program.len());
    }

    #[test]
    fn test_disassemble_empty_buffer() {
        assert!(disassemble(&[], 0).is_empty());
    }
}

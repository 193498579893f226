//! Feature extraction over decoded instruction windows.
//!
//! A window of instructions is reduced to a fixed-width presence vector over
//! the opcode space: position `b` is 1 if any instruction in the window has
//! opcode byte `b`. Order and repetition within the window do not matter.

use crate::decoder::Instruction;

/// Width of the opcode space, and therefore of every feature and weight
/// vector in the crate.
pub const OPCODE_SPACE: usize = 256;

/// 256-wide 0/1 presence vector keyed by opcode byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector([i64; OPCODE_SPACE]);

impl Default for FeatureVector {
    fn default() -> Self {
        FeatureVector([0; OPCODE_SPACE])
    }
}

impl FeatureVector {
    /// Build the presence vector for one instruction window.
    pub fn extract(window: &[Instruction]) -> Self {
        let mut features = [0i64; OPCODE_SPACE];
        for insn in window {
            features[insn.opcode as usize] = 1;
        }
        FeatureVector(features)
    }

    /// The raw vector, indexed by opcode byte.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Dot product against a weight vector of the same width.
    ///
    /// Panics if `weights` is not [`OPCODE_SPACE`] long; model loading
    /// validates the width, so this only fires on misuse.
    pub fn dot(&self, weights: &[i64]) -> i64 {
        assert_eq!(weights.len(), OPCODE_SPACE);
        self.0.iter().zip(weights).map(|(f, w)| f * w).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{decode, padded};

    fn window(bytes: &[u8]) -> Vec<Instruction> {
        // Decode through the pad, as the trainer does for its windows.
        let data = padded(bytes);
        decode(&data, 0, 0, data.len())
    }

    #[test]
    fn test_presence_bits() {
        let insns = window(&[0xA9, 0x05, 0x60]); // LDA #$05 / RTS
        let features = FeatureVector::extract(&insns);

        assert_eq!(features.as_slice()[0xA9], 1);
        assert_eq!(features.as_slice()[0x60], 1);
        // Operand bytes are not opcodes.
        assert_eq!(features.as_slice()[0x05], 0);
        assert_eq!(features.as_slice().iter().sum::<i64>(), 2);
    }

    #[test]
    fn test_order_and_count_independent() {
        // Same opcode set, different order and repetition.
        let a = FeatureVector::extract(&window(&[0xA9, 0x01, 0xA9, 0x02, 0x60]));
        let b = FeatureVector::extract(&window(&[0x60, 0xA9, 0x03]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_window() {
        let features = FeatureVector::extract(&[]);
        assert_eq!(features, FeatureVector::default());
    }

    #[test]
    fn test_dot_product() {
        let features = FeatureVector::extract(&window(&[0xA9, 0x05, 0x60]));
        let mut weights = vec![0i64; OPCODE_SPACE];
        weights[0xA9] = 3;
        weights[0x60] = -1;
        weights[0x00] = 100; // not present in the window
        assert_eq!(features.dot(&weights), 2);
    }
}

//! Linear scoring of feature vectors against the class model.
//!
//! Each class scores as the integer dot product of its weight vector with
//! the feature vector; the class with the strictly greatest score wins. On a
//! tie the lexicographically first label is kept, which is deterministic
//! because model iteration order is sorted.

use std::collections::BTreeMap;

use crate::decoder::{decode, padded, Instruction};
use crate::error::{ClassifyError, Result};
use crate::features::FeatureVector;
use crate::model::Model;

/// Instructions per window in whole-buffer batch classification.
pub const BATCH_WINDOW: usize = 8;

/// Outcome of scoring one feature vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Winning class label.
    pub label: String,
    /// Score of every class, keyed by label.
    pub scores: BTreeMap<String, i64>,
}

/// Score `features` against every class of `model` and pick the winner.
///
/// Fails with [`ClassifyError::EmptyModel`] if the model has no classes;
/// there is no other failure mode.
pub fn classify(model: &Model, features: &FeatureVector) -> Result<Classification> {
    let mut scores = BTreeMap::new();
    let mut best: Option<(&str, i64)> = None;

    for (label, weights) in model.iter() {
        let score = features.dot(weights);
        scores.insert(label.to_string(), score);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((label, score)),
        }
    }

    let (label, _) = best.ok_or(ClassifyError::EmptyModel)?;
    Ok(Classification {
        label: label.to_string(),
        scores,
    })
}

/// One labeled window of a batch classification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledWindow {
    /// Predicted class of the window.
    pub label: String,
    /// The instructions that were scored.
    pub instructions: Vec<Instruction>,
}

/// Disassemble a whole buffer and classify it in [`BATCH_WINDOW`]-sized
/// windows.
///
/// The final window may be shorter. The returned labels, in order, are the
/// per-window classification map for the file.
pub fn classify_buffer(
    model: &Model,
    data: &[u8],
    load_address: u16,
) -> Result<Vec<LabeledWindow>> {
    let buf = padded(data);
    let instructions = decode(&buf, load_address, 0, buf.len());

    let mut windows = Vec::new();
    for chunk in instructions.chunks(BATCH_WINDOW) {
        let features = FeatureVector::extract(chunk);
        let verdict = classify(model, &features)?;
        windows.push(LabeledWindow {
            label: verdict.label,
            instructions: chunk.to_vec(),
        });
    }
    Ok(windows)
}

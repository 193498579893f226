//! Persisted classifier weight model.
//!
//! A model is an open mapping from class label to a 256-integer weight
//! vector, serialized as a plain JSON object so existing model files keep
//! working. Two classes ("code" and "data") are seeded by default; any label
//! ever written persists. The map is a `BTreeMap` so label iteration — and
//! with it the classifier's tie-break — is deterministic.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ClassifyError, Result};
use crate::features::{FeatureVector, OPCODE_SPACE};

/// Labels every fresh model starts with.
pub const DEFAULT_CLASSES: [&str; 2] = ["code", "data"];

/// Class label → weight vector mapping, with JSON persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model {
    classes: BTreeMap<String, Vec<i64>>,
}

impl Model {
    /// Fresh model with the default classes, all weights zero.
    pub fn seeded() -> Self {
        let mut model = Model::default();
        for label in DEFAULT_CLASSES {
            model.ensure_class(label);
        }
        model
    }

    /// Load a model from `path`.
    ///
    /// A missing file yields a fresh seeded model; a file that exists but
    /// cannot be parsed, has a malformed weight vector, or defines no
    /// classes at all is a fatal error.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "model file missing, starting fresh");
                return Ok(Model::seeded());
            }
            Err(e) => return Err(e.into()),
        };

        let model: Model =
            serde_json::from_slice(&raw).map_err(|source| ClassifyError::ModelParse {
                path: path.to_path_buf(),
                source,
            })?;
        model.validate()?;
        debug!(path = %path.display(), classes = model.len(), "model loaded");
        Ok(model)
    }

    /// Persist the model to `path` as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec(self)?;
        fs::write(path, json)?;
        debug!(path = %path.display(), classes = self.len(), "model saved");
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(ClassifyError::EmptyModel);
        }
        for (label, weights) in &self.classes {
            if weights.len() != OPCODE_SPACE {
                return Err(ClassifyError::ModelShape {
                    label: label.clone(),
                    expected: OPCODE_SPACE,
                    actual: weights.len(),
                });
            }
        }
        Ok(())
    }

    /// Weight vector of a class, if it exists.
    pub fn class_weights(&self, label: &str) -> Option<&[i64]> {
        self.classes.get(label).map(Vec::as_slice)
    }

    /// Class labels in deterministic (lexicographic) order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Label/weight pairs in deterministic (lexicographic) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.classes
            .iter()
            .map(|(label, weights)| (label.as_str(), weights.as_slice()))
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True when the model has no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Weight vector of `label`, creating it zero-initialized if absent.
    pub fn ensure_class(&mut self, label: &str) -> &mut Vec<i64> {
        if !self.classes.contains_key(label) {
            info!(label, "registering new class");
            self.classes
                .insert(label.to_string(), vec![0; OPCODE_SPACE]);
        }
        self.classes.get_mut(label).unwrap()
    }

    /// Add the feature vector to the class weights (positive feedback).
    pub fn reinforce(&mut self, label: &str, features: &FeatureVector) {
        let weights = self.ensure_class(label);
        for (w, f) in weights.iter_mut().zip(features.as_slice()) {
            *w += f;
        }
    }

    /// Subtract the feature vector from the class weights (negative
    /// feedback).
    pub fn penalize(&mut self, label: &str, features: &FeatureVector) {
        let weights = self.ensure_class(label);
        for (w, f) in weights.iter_mut().zip(features.as_slice()) {
            *w -= f;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{decode, padded};

    fn sample_features() -> FeatureVector {
        let data = padded(&[0xA9, 0x05, 0x60]);
        let insns = decode(&data, 0, 0, data.len());
        FeatureVector::extract(&insns)
    }

    #[test]
    fn test_seeded_model() {
        let model = Model::seeded();
        assert_eq!(model.len(), 2);
        assert_eq!(model.class_weights("code").unwrap(), &[0i64; 256][..]);
        assert_eq!(model.class_weights("data").unwrap(), &[0i64; 256][..]);
    }

    #[test]
    fn test_labels_are_sorted() {
        let mut model = Model::seeded();
        model.ensure_class("graphics");
        model.ensure_class("aaa");
        let labels: Vec<&str> = model.labels().collect();
        assert_eq!(labels, vec!["aaa", "code", "data", "graphics"]);
    }

    #[test]
    fn test_reinforce_is_additive() {
        let mut model = Model::seeded();
        let features = sample_features();

        model.reinforce("code", &features);
        let once: Vec<i64> = model.class_weights("code").unwrap().to_vec();
        model.reinforce("code", &features);
        let twice = model.class_weights("code").unwrap();

        for i in 0..256 {
            assert_eq!(twice[i], 2 * once[i]);
        }
        assert_eq!(once[0xA9], 1);
        assert_eq!(once[0x60], 1);
    }

    #[test]
    fn test_penalize_inverts_reinforce() {
        let mut model = Model::seeded();
        let features = sample_features();
        model.reinforce("data", &features);
        model.penalize("data", &features);
        assert_eq!(model.class_weights("data").unwrap(), &[0i64; 256][..]);
    }

    #[test]
    fn test_lazy_class_creation() {
        let mut model = Model::seeded();
        assert!(model.class_weights("music").is_none());
        model.reinforce("music", &sample_features());
        assert_eq!(model.len(), 3);
        assert_eq!(model.class_weights("music").unwrap()[0xA9], 1);
    }

    #[test]
    fn test_load_missing_file_seeds() {
        let dir = tempfile::tempdir().unwrap();
        let model = Model::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(model, Model::seeded());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let mut model = Model::seeded();
        model.reinforce("code", &sample_features());
        model.penalize("data", &sample_features());
        model.ensure_class("silence");
        model.save(&path).unwrap();

        let reloaded = Model::load(&path).unwrap();
        assert_eq!(reloaded, model);
    }

    #[test]
    fn test_json_shape_is_plain_object() {
        let model = Model::seeded();
        let json = serde_json::to_value(&model).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["code"].as_array().unwrap().len(), 256);
    }

    #[test]
    fn test_corrupt_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"not json at all").unwrap();
        assert!(matches!(
            Model::load(&path),
            Err(ClassifyError::ModelParse { .. })
        ));
    }

    #[test]
    fn test_wrong_width_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, br#"{"code": [1, 2, 3]}"#).unwrap();
        assert!(matches!(
            Model::load(&path),
            Err(ClassifyError::ModelShape { .. })
        ));
    }

    #[test]
    fn test_zero_classes_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"{}").unwrap();
        assert!(matches!(Model::load(&path), Err(ClassifyError::EmptyModel)));
    }
}

//! Support-email category classifier.
//!
//! The masking engine only needs `predict(text) -> label`. The concrete
//! implementation here scores a TF-IDF vector against one linear model row
//! per label, loaded from a JSON artifact produced offline.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::ClassifierError;

/// Maps masked email text to a category label
pub trait CategoryClassifier: Send + Sync {
    fn predict(&self, masked_text: &str) -> String;
}

impl<F> CategoryClassifier for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn predict(&self, masked_text: &str) -> String {
        self(masked_text)
    }
}

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern should always compile"));

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_lowercase() -> bool {
    true
}

/// On-disk model: vectorizer, linear weights and label list in one file
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub labels: Vec<String>,
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    /// One row per label, one column per vocabulary term
    pub weights: Vec<Vec<f64>>,
    #[serde(default)]
    pub bias: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
}

/// TF-IDF features scored by a linear model, read-only after load
#[derive(Debug, Clone)]
pub struct TfidfLinearClassifier {
    labels: Vec<String>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    lowercase: bool,
}

impl TfidfLinearClassifier {
    /// Load and validate an artifact from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClassifierError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ClassifierError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let classifier = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            labels = classifier.labels.len(),
            features = classifier.idf.len(),
            "loaded classifier artifact"
        );
        Ok(classifier)
    }

    pub fn from_json(raw: &str) -> Result<Self, ClassifierError> {
        let artifact: ModelArtifact = serde_json::from_str(raw)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ClassifierError> {
        let features = artifact.idf.len();

        if artifact.labels.is_empty() {
            return Err(ClassifierError::Invalid("no labels".into()));
        }
        if artifact.weights.len() != artifact.labels.len() {
            return Err(ClassifierError::Invalid(format!(
                "{} weight rows for {} labels",
                artifact.weights.len(),
                artifact.labels.len()
            )));
        }
        if let Some(row) = artifact.weights.iter().position(|w| w.len() != features) {
            return Err(ClassifierError::Invalid(format!(
                "weight row {row} does not have {features} columns"
            )));
        }
        if let Some((term, col)) = artifact.vocabulary.iter().find(|(_, col)| **col >= features) {
            return Err(ClassifierError::Invalid(format!(
                "term {term:?} maps to column {col}, beyond {features} features"
            )));
        }
        let bias = if artifact.bias.is_empty() {
            vec![0.0; artifact.labels.len()]
        } else if artifact.bias.len() == artifact.labels.len() {
            artifact.bias
        } else {
            return Err(ClassifierError::Invalid(format!(
                "{} bias terms for {} labels",
                artifact.bias.len(),
                artifact.labels.len()
            )));
        };
        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::Invalid(format!(
                "bad ngram range ({min_n}, {max_n})"
            )));
        }

        Ok(Self {
            labels: artifact.labels,
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            weights: artifact.weights,
            bias,
            ngram_range: artifact.ngram_range,
            stop_words: artifact.stop_words.into_iter().collect(),
            lowercase: artifact.lowercase,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn terms(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = TOKEN_PATTERN
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Sparse, L2-normalized TF-IDF vector
    fn vectorize(&self, text: &str) -> HashMap<usize, f64> {
        let mut features: HashMap<usize, f64> = HashMap::new();
        for term in self.terms(text) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *features.entry(col).or_default() += 1.0;
            }
        }
        for (col, value) in features.iter_mut() {
            *value *= self.idf[*col];
        }
        let norm = features.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            features.values_mut().for_each(|v| *v /= norm);
        }
        features
    }

    /// Score per label, in label order
    pub fn scores(&self, text: &str) -> Vec<f64> {
        let features = self.vectorize(text);
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| {
                bias + features
                    .iter()
                    .map(|(col, value)| row[*col] * value)
                    .sum::<f64>()
            })
            .collect()
    }
}

impl CategoryClassifier for TfidfLinearClassifier {
    fn predict(&self, masked_text: &str) -> String {
        let scores = self.scores(masked_text);
        let mut best = 0;
        for (idx, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = idx;
            }
        }
        self.labels[best].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> &'static str {
        r#"{
            "labels": ["Incident", "Request", "Problem"],
            "vocabulary": {
                "crash": 0, "error": 1, "please": 2, "access": 3,
                "again": 4, "email": 5, "crash again": 6
            },
            "idf": [1.5, 1.2, 1.1, 1.3, 1.0, 1.0, 2.0],
            "weights": [
                [2.0, 1.5, 0.0, 0.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 1.5, 2.0, 0.0, 0.1, 0.0],
                [0.5, 0.0, 0.0, 0.0, 0.5, 0.0, 3.0]
            ],
            "bias": [0.0, 0.05, 0.0],
            "ngram_range": [1, 2],
            "stop_words": ["the", "it", "my"]
        }"#
    }

    #[test]
    fn test_predicts_by_highest_score() {
        let classifier = TfidfLinearClassifier::from_json(artifact()).unwrap();
        assert_eq!(classifier.predict("The app shows an error"), "Incident");
        assert_eq!(
            classifier.predict("Please grant access to [email]"),
            "Request"
        );
        assert_eq!(classifier.predict("It will crash again and again"), "Problem");
    }

    #[test]
    fn test_unknown_text_falls_back_to_bias() {
        let classifier = TfidfLinearClassifier::from_json(artifact()).unwrap();
        assert_eq!(classifier.predict(""), "Request");
        assert_eq!(classifier.predict("zzz qqq"), "Request");
    }

    #[test]
    fn test_stop_words_removed_before_ngrams() {
        let classifier = TfidfLinearClassifier::from_json(artifact()).unwrap();
        let terms = classifier.terms("crash the again");
        assert!(terms.contains(&"crash again".to_string()));
        assert!(!terms.iter().any(|t| t.contains("the")));
    }

    #[test]
    fn test_vector_is_normalized() {
        let classifier = TfidfLinearClassifier::from_json(artifact()).unwrap();
        let features = classifier.vectorize("error error access");
        let norm: f64 = features.values().map(|v| v * v).sum();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_mismatched_shapes() {
        let bad = r#"{"labels": ["A", "B"], "vocabulary": {"x": 0}, "idf": [1.0], "weights": [[1.0]]}"#;
        assert!(matches!(
            TfidfLinearClassifier::from_json(bad),
            Err(ClassifierError::Invalid(_))
        ));

        let bad = r#"{"labels": ["A"], "vocabulary": {"x": 3}, "idf": [1.0], "weights": [[1.0]]}"#;
        assert!(matches!(
            TfidfLinearClassifier::from_json(bad),
            Err(ClassifierError::Invalid(_))
        ));

        let bad = r#"{"labels": [], "vocabulary": {}, "idf": [], "weights": []}"#;
        assert!(matches!(
            TfidfLinearClassifier::from_json(bad),
            Err(ClassifierError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            TfidfLinearClassifier::from_json("{not json"),
            Err(ClassifierError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TfidfLinearClassifier::load(dir.path().join("model.json")).unwrap_err();
        assert!(matches!(err, ClassifierError::NotFound { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, artifact()).unwrap();
        let classifier = TfidfLinearClassifier::load(&path).unwrap();
        assert_eq!(classifier.labels().len(), 3);
    }

    #[test]
    fn test_closure_is_a_classifier() {
        let fixed = |_: &str| "Change".to_string();
        assert_eq!(fixed.predict("anything"), "Change");
    }
}

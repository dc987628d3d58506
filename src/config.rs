//! Circuit configuration, loaded from JSON.
//!
//! ```json
//! { "mode": "quiz", "questions": 3, "options_per_question": 4, "commitment_version": 1 }
//! ```

use crate::circuit::{CircuitMode, TriviaCircuit};
use crate::errors::ConfigError;
use crate::poseidon::COMMITMENT_VERSION;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Single,
    Quiz,
}

fn default_commitment_version() -> u32 {
    COMMITMENT_VERSION
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitConfig {
    pub mode: ModeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_per_question: Option<usize>,
    /// Must match the commitment function this build implements
    #[serde(default = "default_commitment_version")]
    pub commitment_version: u32,
}

impl CircuitConfig {
    pub fn single() -> Self {
        CircuitConfig {
            mode: ModeKind::Single,
            questions: None,
            options_per_question: None,
            commitment_version: COMMITMENT_VERSION,
        }
    }

    pub fn quiz(questions: usize, options_per_question: usize) -> Self {
        CircuitConfig {
            mode: ModeKind::Quiz,
            questions: Some(questions),
            options_per_question: Some(options_per_question),
            commitment_version: COMMITMENT_VERSION,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: CircuitConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let config: CircuitConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.commitment_version != COMMITMENT_VERSION {
            return Err(ConfigError::UnsupportedCommitmentVersion {
                found: self.commitment_version,
                supported: COMMITMENT_VERSION,
            });
        }
        self.circuit_mode().map(|_| ())
    }

    pub fn circuit_mode(&self) -> Result<CircuitMode, ConfigError> {
        match self.mode {
            ModeKind::Single => {
                if self.questions.is_some_and(|q| q != 1) || self.options_per_question.is_some() {
                    return Err(ConfigError::Invalid(
                        "single-question circuits take exactly one question and no options".to_string(),
                    ));
                }
                Ok(CircuitMode::Single)
            }
            ModeKind::Quiz => {
                let (Some(questions), Some(options_per_question)) =
                    (self.questions, self.options_per_question)
                else {
                    return Err(ConfigError::Invalid(
                        "quiz circuits need `questions` and `options_per_question`".to_string(),
                    ));
                };
                let mode = CircuitMode::Quiz {
                    questions,
                    options_per_question,
                };
                mode.validate()
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?;
                Ok(mode)
            }
        }
    }

    pub fn circuit(&self) -> Result<TriviaCircuit, ConfigError> {
        let mode = self.circuit_mode()?;
        TriviaCircuit::new(mode).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

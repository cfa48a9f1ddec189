/// Result of semantic validation of a [`crate::GenerationConfig`].
///
/// Validation is best-effort and reports every problem found in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationDiagnostics {
    pub warnings: Vec<ConfigWarning>,
    pub errors: Vec<ConfigValidationError>,
}

impl ValidationDiagnostics {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Functional mocking is enabled but can never trigger.
    FunctionalMockingNeverTriggers { probability: String },
    DuplicateDefaultCandidate { name: String },
    LoggingLevelInvalid { value: String, normalized: String },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::FunctionalMockingNeverTriggers { probability } => write!(
                f,
                "functional_mocking.enabled is set but probability is {probability}"
            ),
            ConfigWarning::DuplicateDefaultCandidate { name } => {
                write!(f, "default candidate `{name}` is listed more than once")
            }
            ConfigWarning::LoggingLevelInvalid { value, normalized } => write!(
                f,
                "logging.level `{value}` is not a valid filter (normalized to `{normalized}`)"
            ),
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    RankBiasOutOfRange { value: f64 },
    ProbabilityOutOfRange { toml_path: String, value: f64 },
    EmptyDefaultCandidateName { index: usize },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValidationError::RankBiasOutOfRange { value } => {
                write!(f, "rank_bias must lie in (1, 2], got {value}")
            }
            ConfigValidationError::ProbabilityOutOfRange { toml_path, value } => {
                write!(f, "{toml_path} must lie in [0, 1], got {value}")
            }
            ConfigValidationError::EmptyDefaultCandidateName { index } => {
                write!(f, "default_candidates[{index}].name must not be empty")
            }
        }
    }
}

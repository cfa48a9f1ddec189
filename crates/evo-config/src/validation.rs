use std::collections::HashSet;

use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::GenerationConfig;

impl GenerationConfig {
    /// Validate semantic invariants that the TOML schema alone cannot express.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_rank_bias(self, &mut out);
        validate_functional_mocking(self, &mut out);
        validate_default_candidates(self, &mut out);
        validate_logging(self, &mut out);

        out
    }
}

fn validate_rank_bias(config: &GenerationConfig, out: &mut ValidationDiagnostics) {
    // Above 2 the selection formula can no longer reach the end of the candidate list.
    let b = config.rank_bias;
    if !(b > 1.0 && b <= 2.0) {
        out.errors
            .push(ConfigValidationError::RankBiasOutOfRange { value: b });
    }
}

fn validate_functional_mocking(config: &GenerationConfig, out: &mut ValidationDiagnostics) {
    let mocking = &config.functional_mocking;
    if !(0.0..=1.0).contains(&mocking.probability) {
        out.errors.push(ConfigValidationError::ProbabilityOutOfRange {
            toml_path: "functional_mocking.probability".to_owned(),
            value: mocking.probability,
        });
        return;
    }
    if mocking.enabled && mocking.probability == 0.0 {
        out.warnings
            .push(ConfigWarning::FunctionalMockingNeverTriggers {
                probability: mocking.probability.to_string(),
            });
    }
}

fn validate_default_candidates(config: &GenerationConfig, out: &mut ValidationDiagnostics) {
    let mut seen = HashSet::new();
    for (index, candidate) in config.default_candidates.iter().enumerate() {
        let name = candidate.name.trim();
        if name.is_empty() {
            out.errors
                .push(ConfigValidationError::EmptyDefaultCandidateName { index });
            continue;
        }
        if !seen.insert(name) {
            out.warnings.push(ConfigWarning::DuplicateDefaultCandidate {
                name: name.to_owned(),
            });
        }
    }
}

fn validate_logging(config: &GenerationConfig, out: &mut ValidationDiagnostics) {
    let normalized = config.logging.level_directives();
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }
}

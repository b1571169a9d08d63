//! Submission proof checking.
//!
//! The policy is chosen once at startup: either every submission passes,
//! or each one must carry the digest binding its name/score pair to the
//! configured salt. The digest is deterministic, so this discourages
//! casual tampering only; it is not authentication.

use shared::binding_proof;

/// Proof policy applied to every submission.
#[derive(Debug, Clone)]
pub enum ProofPolicy {
    /// No proof required; the field is ignored entirely.
    Disabled,
    /// Submissions must carry `binding_proof(name, score, salt)`.
    Required { salt: String },
}

impl ProofPolicy {
    pub fn from_config(require_proof: bool, salt: &str) -> Self {
        if require_proof {
            ProofPolicy::Required {
                salt: salt.to_string(),
            }
        } else {
            ProofPolicy::Disabled
        }
    }

    /// Whether `supplied` proves knowledge of the salt for this pair.
    ///
    /// Comparison is exact string equality on the hex digest.
    pub fn verify(&self, name: &str, score: i64, supplied: Option<&str>) -> bool {
        match self {
            ProofPolicy::Disabled => true,
            ProofPolicy::Required { salt } => {
                supplied == Some(binding_proof(name, score, salt).as_str())
            }
        }
    }
}

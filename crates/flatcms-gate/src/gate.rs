use flatcms_types::SessionIdentity;
use tracing::{debug, warn};

use crate::operation::Operation;

/// Message attached to every denial.
pub const DENIED_MESSAGE: &str = "You must be signed in to do that.";

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

/// The outcome of asking the gate.
///
/// A denial is an ordinary control-flow outcome, not an error: the caller
/// redirects with `message` and performs no side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    Denied { message: String },
}

impl Authorization {
    /// Returns `true` if the caller may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// The denial message, if denied.
    pub fn denial_message(&self) -> Option<&str> {
        match self {
            Self::Allowed => None,
            Self::Denied { message } => Some(message),
        }
    }
}

// ---------------------------------------------------------------------------
// AccessGate
// ---------------------------------------------------------------------------

/// Stateless sign-in check in front of every document mutation.
///
/// There is a single credential tier: any signed-in user may perform every
/// gated operation.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessGate;

impl AccessGate {
    pub fn new() -> Self {
        Self
    }

    /// `Allowed` iff `identity` carries a non-empty username.
    pub fn authorize(&self, identity: &SessionIdentity) -> Authorization {
        if identity.is_authenticated() {
            Authorization::Allowed
        } else {
            Authorization::Denied {
                message: DENIED_MESSAGE.to_string(),
            }
        }
    }

    /// [`authorize`](Self::authorize), with the decision logged against `operation`.
    pub fn check(&self, identity: &SessionIdentity, operation: Operation) -> Authorization {
        let decision = self.authorize(identity);
        match &decision {
            Authorization::Allowed => debug!(
                %operation,
                mutates = operation.mutates(),
                user = identity.username().unwrap_or_default(),
                "gate allowed"
            ),
            Authorization::Denied { .. } if operation.mutates() => {
                warn!(%operation, "gate denied anonymous mutation")
            }
            Authorization::Denied { .. } => debug!(%operation, "gate denied anonymous form view"),
        }
        decision
    }
}

//! Access verdicts.
//!
//! A role set is evaluated against one permission and yields one of three
//! verdicts. An allow from any role wins over an explicit deny, and a deny
//! wins over silence.

use serde::Serialize;

/// Outcome of evaluating roles against a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// At least one role allows the permission.
    Allowed,
    /// No role allows it and at least one role denies it.
    Denied,
    /// No role says anything about the permission.
    Undefined,
}

impl Access {
    /// Combine two verdicts using `Allowed > Denied > Undefined`.
    ///
    /// The operation is commutative and associative, with `Undefined` as
    /// identity, so folding a role set in any order gives the same result.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Allowed, _) | (_, Self::Allowed) => Self::Allowed,
            (Self::Denied, _) | (_, Self::Denied) => Self::Denied,
            (Self::Undefined, Self::Undefined) => Self::Undefined,
        }
    }

    /// Fold any number of verdicts into one.
    pub fn combine<I>(verdicts: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut acc = Self::Undefined;
        for verdict in verdicts {
            acc = acc.merge(verdict);
            if acc == Self::Allowed {
                break;
            }
        }
        acc
    }

    /// Whether the verdict lets the action through.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

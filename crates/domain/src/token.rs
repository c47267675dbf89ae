// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Presential confirmation token, e.g. `R00042`.
///
/// Derived from a store-wide sequence and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfirmationToken {
    code: String,
    sequence: u32,
}

impl ConfirmationToken {
    /// Builds the token for a sequence number.
    #[must_use]
    pub fn from_sequence(sequence: u32) -> Self {
        Self {
            code: format!("R{sequence:05}"),
            sequence,
        }
    }

    /// Rebuilds a token from its persisted parts.
    #[must_use]
    pub const fn from_parts(code: String, sequence: u32) -> Self {
        Self { code, sequence }
    }

    /// The printable token.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The sequence number the token was derived from.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl std::fmt::Display for ConfirmationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

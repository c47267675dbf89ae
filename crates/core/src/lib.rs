// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod bonus;
mod command;
mod context;
mod engine;
mod error;
mod ledger;
mod lifecycle;
mod outcome;
mod selections;
mod sessions;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply;
pub use command::Command;
pub use context::{EngineSettings, OperationContext};
pub use engine::{reallocate_session, reallocate_sessions};
pub use error::CoreError;
pub use ledger::{Ledger, NewSelection};
pub use outcome::{BonusOutcome, CommandOutcome};

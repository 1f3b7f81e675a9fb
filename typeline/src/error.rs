// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::environment::PropKey;

/// Error type for environment and view operations.
///
/// Carries a non-exhaustive [`ErrorKind`] describing which precondition was
/// violated.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The environment property involved, if the error concerns one.
    pub fn prop(&self) -> Option<PropKey> {
        match self.kind {
            ErrorKind::EnvironmentRunning { prop } => prop,
            ErrorKind::UnbalancedRestore { prop } => Some(prop),
        }
    }

    pub(crate) fn environment_running(prop: Option<PropKey>) -> Self {
        Self {
            kind: ErrorKind::EnvironmentRunning { prop },
        }
    }

    pub(crate) fn unbalanced_restore(prop: PropKey) -> Self {
        Self {
            kind: ErrorKind::UnbalancedRestore { prop },
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::EnvironmentRunning { prop: Some(prop) } => write!(
                f,
                "cannot change {prop:?} while a layout or draw traversal is running"
            ),
            ErrorKind::EnvironmentRunning { prop: None } => {
                write!(
                    f,
                    "cannot change the environment while a layout or draw traversal is running"
                )
            }
            ErrorKind::UnbalancedRestore { prop } => {
                write!(f, "restore of {prop:?} without a matching save")
            }
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A guarded setter was called while the environment had pending saves.
    EnvironmentRunning {
        /// The property that was being changed, `None` for measure limits.
        prop: Option<PropKey>,
    },

    /// A property was restored more often than it was saved.
    UnbalancedRestore {
        /// The property whose stack was empty.
        prop: PropKey,
    },
}

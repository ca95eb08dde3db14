// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Panic containment for the `safe` and `run` boundaries

use crate::outcome::PanicError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Panic payloads that no boundary may swallow
///
/// Raise one with `std::panic::panic_any(FatalSignal::Interrupted)`. Stack
/// overflow and allocation failure abort the process before any boundary
/// sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalSignal {
    Interrupted,
    Shutdown,
}

#[must_use]
pub fn is_fatal(payload: &(dyn Any + Send)) -> bool {
    payload.is::<FatalSignal>()
}

/// Run `f`, turning a non-fatal panic into a [`PanicError`].
///
/// Fatal panics continue unwinding.
pub(crate) fn contain<T>(f: impl FnOnce() -> T) -> Result<T, PanicError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) if is_fatal(&*payload) => panic::resume_unwind(payload),
        Err(payload) => Err(PanicError::from_payload(&*payload)),
    }
}

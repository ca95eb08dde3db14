// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! ManagedOp - a composable action against the metadata store
//!
//! A `ManagedOp<A>` wraps a function from the configuration and an open
//! client handle to an [`Outcome<A>`]. Composition never runs anything;
//! [`ManagedOp::run`] acquires a client and evaluates the whole pipeline
//! against it.
//!
//! Plain combinators do not catch panics. Use [`ManagedOp::safe`] to turn
//! a panic inside part of a pipeline into a failure; `run` converts
//! whatever is left at the outer boundary.

use crate::conf::HiveConf;
use crate::contain::contain;
use crate::outcome::{Failure, Outcome, OutcomeExt};
use metastore::MetaStoreClient;
use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

type OpFn<A> = dyn Fn(&HiveConf, &dyn MetaStoreClient) -> Outcome<A> + Send + Sync;

pub struct ManagedOp<A> {
    op: Arc<OpFn<A>>,
}

impl<A> Clone for ManagedOp<A> {
    fn clone(&self) -> Self {
        Self {
            op: Arc::clone(&self.op),
        }
    }
}

impl<A> fmt::Debug for ManagedOp<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ManagedOp")
    }
}

impl<A: 'static> ManagedOp<A> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&HiveConf, &dyn MetaStoreClient) -> Outcome<A> + Send + Sync + 'static,
    {
        Self { op: Arc::new(f) }
    }

    /// An operation that only needs the client
    pub fn with_client<F>(f: F) -> Self
    where
        F: Fn(&dyn MetaStoreClient) -> Outcome<A> + Send + Sync + 'static,
    {
        Self::new(move |_, client| f(client))
    }

    /// An operation that only needs the configuration
    pub fn with_conf<F>(f: F) -> Self
    where
        F: Fn(&HiveConf) -> Outcome<A> + Send + Sync + 'static,
    {
        Self::new(move |conf, _| f(conf))
    }

    /// Always succeeds with `value`
    pub fn value(value: A) -> Self
    where
        A: Clone + Send + Sync,
    {
        Self::new(move |_, _| Ok(value.clone()))
    }

    /// Always yields `outcome`
    pub fn result(outcome: Outcome<A>) -> Self
    where
        A: Clone + Send + Sync,
    {
        Self::new(move |_, _| outcome.clone())
    }

    /// Always fails with `message`
    pub fn fail<M: Into<String>>(message: M) -> Self {
        let failure = Failure::message(message);
        Self::new(move |_, _| Err(failure.clone()))
    }

    /// Always fails with `message` and `cause`
    pub fn error<M, E>(message: M, cause: E) -> Self
    where
        M: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let failure = Failure::error(message, cause);
        Self::new(move |_, _| Err(failure.clone()))
    }

    /// Evaluate against an already acquired client
    pub fn execute(&self, conf: &HiveConf, client: &dyn MetaStoreClient) -> Outcome<A> {
        (self.op)(conf, client)
    }

    pub fn map<B, F>(self, f: F) -> ManagedOp<B>
    where
        B: 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        ManagedOp::new(move |conf, client| self.execute(conf, client).map(&f))
    }

    /// Sequence: on success continue with the operation `f` builds,
    /// sharing the same configuration and client
    pub fn flat_map<B, F>(self, f: F) -> ManagedOp<B>
    where
        B: 'static,
        F: Fn(A) -> ManagedOp<B> + Send + Sync + 'static,
    {
        ManagedOp::new(move |conf, client| {
            self.execute(conf, client)
                .and_then(|value| f(value).execute(conf, client))
        })
    }

    /// Sequence a step that needs neither configuration nor client
    pub fn and_then<B, F>(self, f: F) -> ManagedOp<B>
    where
        B: 'static,
        F: Fn(A) -> Outcome<B> + Send + Sync + 'static,
    {
        ManagedOp::new(move |conf, client| self.execute(conf, client).and_then(&f))
    }

    /// Convert a non-fatal panic while evaluating this operation into a
    /// failure carrying the panic as its cause
    #[must_use]
    pub fn safe(self) -> Self {
        Self::new(move |conf, client| match contain(|| self.execute(conf, client)) {
            Ok(outcome) => outcome,
            Err(panic) => {
                diagnostics::warn!(
                    "Operation panicked: {reason}",
                    reason: panic.panic_message()
                );
                Err(Failure::exception(panic))
            }
        })
    }

    /// `map` that survives `f` panicking
    pub fn safe_map<B, F>(self, f: F) -> ManagedOp<B>
    where
        B: 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        self.map(f).safe()
    }

    #[must_use]
    pub fn set_message<M: Into<String>>(self, message: M) -> Self {
        let message = message.into();
        Self::new(move |conf, client| {
            self.execute(conf, client).set_message(message.as_str())
        })
    }

    #[must_use]
    pub fn add_message<M: Into<String>>(self, message: M) -> Self {
        let message = message.into();
        Self::new(move |conf, client| {
            self.execute(conf, client).add_message(message.as_str())
        })
    }

    /// Left-biased fallback: `other` runs only when `self` fails, and its
    /// outcome replaces the failure
    #[must_use]
    pub fn or(self, other: ManagedOp<A>) -> Self {
        Self::new(move |conf, client| {
            self.execute(conf, client)
                .or_else(|_| other.execute(conf, client))
        })
    }
}

/// `a | b` is `a.or(b)`
impl<A: 'static> BitOr for ManagedOp<A> {
    type Output = ManagedOp<A>;

    fn bitor(self, other: ManagedOp<A>) -> ManagedOp<A> {
        self.or(other)
    }
}

// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Client lifecycle - one client per `run`, released on every exit path

use crate::conf::HiveConf;
use crate::contain::contain;
use crate::op::ManagedOp;
use crate::outcome::{Failure, Outcome};
use metastore::{ClientFactory, MetaStoreClient};
use std::mem::ManuallyDrop;

/// Message of the failure returned when no client could be acquired
pub const CREATE_CLIENT_FAILED: &str = "Failed to create client";

/// Message of the failure returned when evaluation panicked
pub const RUN_OPERATION_FAILED: &str = "Failed to run operation";

/// Owns an acquired client and hands it back to its factory on drop
pub(crate) struct ClientGuard<'a> {
    factory: &'a dyn ClientFactory,
    client: ManuallyDrop<Box<dyn MetaStoreClient>>,
}

impl<'a> ClientGuard<'a> {
    pub(crate) fn acquire(conf: &'a HiveConf) -> Outcome<Self> {
        let factory = conf.factory();
        match contain(|| factory.acquire(conf.settings())) {
            Ok(Ok(client)) => {
                diagnostics::debug!("Acquired metastore client");
                Ok(Self {
                    factory,
                    client: ManuallyDrop::new(client),
                })
            }
            Ok(Err(e)) => {
                let reason = e.to_string();
                diagnostics::warn!(
                    "Could not acquire metastore client: {reason}",
                    reason: reason.as_str()
                );
                Err(Failure::error(CREATE_CLIENT_FAILED, e))
            }
            Err(panic) => {
                diagnostics::warn!(
                    "Client acquisition panicked: {reason}",
                    reason: panic.panic_message()
                );
                Err(Failure::error(CREATE_CLIENT_FAILED, panic))
            }
        }
    }

    pub(crate) fn client(&self) -> &dyn MetaStoreClient {
        &**self.client
    }
}

impl Drop for ClientGuard<'_> {
    fn drop(&mut self) {
        // SAFETY: `client` is taken exactly once, here, and never read again
        let client = unsafe { ManuallyDrop::take(&mut self.client) };
        self.factory.release(client);
        diagnostics::debug!("Released metastore client");
    }
}

impl<A: 'static> ManagedOp<A> {
    /// Acquire a client, evaluate the operation with it, release it.
    ///
    /// The only place a client is created. Failures come back as values;
    /// a panic during evaluation becomes a failure unless it is a
    /// [`crate::FatalSignal`], which keeps unwinding after the client has
    /// been released.
    pub fn run(&self, conf: &HiveConf) -> Outcome<A> {
        let guard = ClientGuard::acquire(conf)?;

        let outcome = match contain(|| self.execute(conf, guard.client())) {
            Ok(outcome) => outcome,
            Err(panic) => {
                diagnostics::warn!(
                    "Operation panicked: {reason}",
                    reason: panic.panic_message()
                );
                Err(Failure::error(RUN_OPERATION_FAILED, panic))
            }
        };

        drop(guard);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contain::FatalSignal;
    use metastore::{MemoryMetaStore, MetaStoreSettings, MetastoreError};
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RefusingFactory;

    impl ClientFactory for RefusingFactory {
        fn acquire(
            &self,
            _settings: &MetaStoreSettings,
        ) -> metastore::Result<Box<dyn MetaStoreClient>> {
            Err(MetastoreError::Connection("connection refused".to_string()))
        }

        fn release(&self, _client: Box<dyn MetaStoreClient>) {}
    }

    struct PanickingFactory;

    impl ClientFactory for PanickingFactory {
        fn acquire(
            &self,
            _settings: &MetaStoreSettings,
        ) -> metastore::Result<Box<dyn MetaStoreClient>> {
            panic!("no route to metastore")
        }

        fn release(&self, _client: Box<dyn MetaStoreClient>) {}
    }

    fn settings() -> MetaStoreSettings {
        MetaStoreSettings::new("/warehouse")
    }

    fn memory_conf() -> (HiveConf, MemoryMetaStore) {
        let store = MemoryMetaStore::new();
        (HiveConf::new(settings(), store.clone()), store)
    }

    #[test]
    fn test_acquisition_failure_skips_the_operation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let op = {
            let calls = Arc::clone(&calls);
            ManagedOp::new(move |_, _| {
                _ = calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        };

        let conf = HiveConf::new(settings(), RefusingFactory);
        let failure = op.run(&conf).expect_err("no client");
        assert_eq!(failure.get_message(), Some(CREATE_CLIENT_FAILED));
        assert_eq!(
            failure.cause().map(ToString::to_string),
            Some("Connection error: connection refused".to_string())
        );

        let conf = HiveConf::new(settings(), PanickingFactory);
        let failure = op.run(&conf).expect_err("no client");
        assert_eq!(failure.get_message(), Some(CREATE_CLIENT_FAILED));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_release_after_success_and_failure() -> metastore::Result<()> {
        let (conf, store) = memory_conf();

        assert_eq!(ManagedOp::value(1).run(&conf), Ok(1));
        assert_eq!(store.open_clients()?, 0);

        let failed = ManagedOp::<u32>::fail("validation").run(&conf);
        assert_eq!(failed, Err(Failure::message("validation")));
        assert_eq!(store.open_clients()?, 0);
        assert_eq!(store.acquired_clients()?, 2);
        Ok(())
    }

    #[test]
    fn test_panic_becomes_run_failure() -> metastore::Result<()> {
        let (conf, store) = memory_conf();
        let op = ManagedOp::<u32>::new(|_, _| panic!("thrift frame corrupted"));

        let failure = op.run(&conf).expect_err("contained");
        assert_eq!(failure.get_message(), Some(RUN_OPERATION_FAILED));
        assert_eq!(
            failure.cause().map(ToString::to_string),
            Some("panicked: thrift frame corrupted".to_string())
        );
        assert_eq!(store.open_clients()?, 0);
        Ok(())
    }

    #[test]
    fn test_fatal_signal_escapes_after_release() -> metastore::Result<()> {
        let (conf, store) = memory_conf();
        let op = ManagedOp::<u32>::new(|_, _| panic::panic_any(FatalSignal::Shutdown)).safe();

        let escaped = panic::catch_unwind(AssertUnwindSafe(|| op.run(&conf)));
        let payload = escaped.expect_err("fatal signal propagates");
        assert_eq!(
            payload.downcast_ref::<FatalSignal>(),
            Some(&FatalSignal::Shutdown)
        );
        assert_eq!(store.open_clients()?, 0);
        assert_eq!(store.acquired_clients()?, 1);
        Ok(())
    }

    #[test]
    fn test_guard_releases_once_on_drop() -> metastore::Result<()> {
        let (conf, store) = memory_conf();
        let guard = ClientGuard::acquire(&conf)
            .map_err(|failure| MetastoreError::Connection(failure.to_string()))?;
        assert!(guard.client().database_exists("default")?);
        assert_eq!(store.open_clients()?, 1);

        drop(guard);
        assert_eq!(store.open_clients()?, 0);
        assert_eq!(store.acquired_clients()?, 1);
        Ok(())
    }

    #[test]
    fn test_each_run_gets_its_own_client() -> metastore::Result<()> {
        let (conf, store) = memory_conf();
        let op = ManagedOp::value(()).flat_map(|()| ManagedOp::value(()));
        for _ in 0..3 {
            assert_eq!(op.run(&conf), Ok(()));
        }
        assert_eq!(store.acquired_clients()?, 3);
        assert_eq!(store.open_clients()?, 0);
        Ok(())
    }
}

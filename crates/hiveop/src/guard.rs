// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Validation steps for pipelines

use crate::op::ManagedOp;

/// Succeeds when `condition` holds, otherwise fails with `message`
pub fn guard<M: Into<String>>(condition: bool, message: M) -> ManagedOp<()> {
    if condition {
        ManagedOp::value(())
    } else {
        ManagedOp::fail(message)
    }
}

/// Fails with `message` when `condition` holds
pub fn prevent<M: Into<String>>(condition: bool, message: M) -> ManagedOp<()> {
    guard(!condition, message)
}

/// `op` must yield `true`
pub fn mandatory<M: Into<String>>(op: ManagedOp<bool>, message: M) -> ManagedOp<()> {
    let message = message.into();
    op.flat_map(move |condition| guard(condition, message.as_str()))
}

/// `op` must yield `false`
pub fn forbidden<M: Into<String>>(op: ManagedOp<bool>, message: M) -> ManagedOp<()> {
    let message = message.into();
    op.flat_map(move |condition| prevent(condition, message.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::HiveConf;
    use crate::outcome::{Failure, Outcome};
    use metastore::{MemoryMetaStore, MetaStoreSettings};

    fn eval(op: &ManagedOp<()>) -> Outcome<()> {
        let settings = MetaStoreSettings::new("/warehouse");
        let conf = HiveConf::embedded(settings.clone());
        let client = MemoryMetaStore::new().client(&settings);
        op.execute(&conf, &client)
    }

    #[test]
    fn test_guard_and_prevent() {
        assert_eq!(eval(&guard(true, "m")), Ok(()));
        assert_eq!(eval(&guard(false, "m")), Err(Failure::message("m")));
        assert_eq!(eval(&prevent(true, "m")), Err(Failure::message("m")));
        assert_eq!(eval(&prevent(false, "m")), Ok(()));
    }

    #[test]
    fn test_mandatory() {
        assert_eq!(eval(&mandatory(ManagedOp::value(true), "must")), Ok(()));
        assert_eq!(
            eval(&mandatory(ManagedOp::value(false), "must")),
            Err(Failure::message("must"))
        );
        assert_eq!(
            eval(&mandatory(ManagedOp::fail("upstream"), "must")),
            Err(Failure::message("upstream"))
        );
    }

    #[test]
    fn test_forbidden() {
        assert_eq!(eval(&forbidden(ManagedOp::value(false), "must not")), Ok(()));
        assert_eq!(
            eval(&forbidden(ManagedOp::value(true), "must not")),
            Err(Failure::message("must not"))
        );
        assert_eq!(
            eval(&forbidden(ManagedOp::fail("upstream"), "must not")),
            Err(Failure::message("upstream"))
        );
    }
}

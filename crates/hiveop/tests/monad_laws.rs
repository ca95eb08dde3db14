//! Identity and associativity of `flat_map`, checked by running both sides
//! of each law against equal, freshly created configurations.

use hiveop::catalog::{create_database, exists_database};
use hiveop::{Failure, HiveConf, ManagedOp, Outcome};
use metastore::MetaStoreSettings;
use std::sync::Arc;

type Step = Arc<dyn Fn(u32) -> ManagedOp<u32> + Send + Sync>;

fn fresh_conf() -> HiveConf {
    HiveConf::embedded(MetaStoreSettings::new("/warehouse"))
}

fn same<A: PartialEq + std::fmt::Debug + 'static>(left: &ManagedOp<A>, right: &ManagedOp<A>) {
    assert_eq!(left.run(&fresh_conf()), right.run(&fresh_conf()));
}

fn operations() -> Vec<ManagedOp<u32>> {
    vec![
        ManagedOp::value(1),
        ManagedOp::value(8),
        ManagedOp::fail("no value"),
        create_database("laws").map(|created| u32::from(created) + 40),
        create_database("laws")
            .flat_map(|_| create_database("laws"))
            .map(u32::from),
        exists_database("missing").and_then(|exists| -> Outcome<u32> {
            if exists {
                Ok(1)
            } else {
                Err(Failure::message("missing database"))
            }
        }),
    ]
}

fn step<F>(f: F) -> Step
where
    F: Fn(u32) -> ManagedOp<u32> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn steps() -> Vec<Step> {
    vec![
        step(|x| ManagedOp::value(x + 1)),
        step(|x| {
            if x % 2 == 0 {
                ManagedOp::fail(format!("{x} is even"))
            } else {
                ManagedOp::value(x * 3)
            }
        }),
        step(|x| create_database(&format!("db{x}")).map(move |created| x + u32::from(created))),
        step(|x| {
            create_database("shared")
                .flat_map(move |_| create_database("shared"))
                .map(move |again| if again { x } else { x + 100 })
        }),
        step(|_| ManagedOp::fail("always")),
    ]
}

fn call(f: &Step) -> impl Fn(u32) -> ManagedOp<u32> + Send + Sync + 'static {
    let f = Arc::clone(f);
    move |x| f(x)
}

#[test]
fn test_left_identity() {
    for value in [0_u32, 1, 2, 7] {
        for f in steps() {
            let left = ManagedOp::value(value).flat_map(call(&f));
            let right = f(value);
            same(&left, &right);
        }
    }
}

#[test]
fn test_right_identity() {
    for op in operations() {
        let bound = op.clone().flat_map(ManagedOp::value);
        same(&bound, &op);
    }
}

#[test]
fn test_associativity() {
    for op in operations() {
        for f in steps() {
            for g in steps() {
                let left = op.clone().flat_map(call(&f)).flat_map(call(&g));

                let (f, g) = (Arc::clone(&f), Arc::clone(&g));
                let right = op
                    .clone()
                    .flat_map(move |a| f(a).flat_map(call(&g)));

                same(&left, &right);
            }
        }
    }
}

#[test]
fn test_failures_survive_the_laws() {
    let failed: ManagedOp<u32> = ManagedOp::fail("boom");
    assert_eq!(
        failed.clone().flat_map(ManagedOp::value).run(&fresh_conf()),
        Err(Failure::message("boom"))
    );
    assert_eq!(failed.run(&fresh_conf()), Err(Failure::message("boom")));
}

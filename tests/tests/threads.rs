use std::sync::{Arc, Barrier};
use std::thread;

use ioc_runtime::{Behavior, Container, IocError, Value};
use ioc_testing::{assert_not_found, init_tracing};

#[test]
fn switching_scope_on_one_thread_leaves_others_on_root() {
    init_tracing();
    let container = Container::new();
    let switched = Arc::new(Barrier::new(2));
    let checked = Arc::new(Barrier::new(2));

    let a = {
        let container = container.clone();
        let (switched, checked) = (switched.clone(), checked.clone());
        thread::spawn(move || {
            let child = container.create_scope().unwrap();
            container.set_current_scope(child.clone()).unwrap();
            switched.wait();
            checked.wait();
            container.current_scope().unwrap().id() == child.id()
        })
    };

    let b = {
        let container = container.clone();
        thread::spawn(move || {
            switched.wait();
            let on_root = container.is_root(&container.current_scope().unwrap());
            checked.wait();
            on_root
        })
    };

    assert!(a.join().unwrap(), "thread A lost its own binding");
    assert!(b.join().unwrap(), "thread B observed thread A's scope");
    assert!(container.is_root(&container.current_scope().unwrap()));
}

#[test]
fn registrations_in_a_thread_scope_stay_private() {
    let container = Container::new();
    let registered = Arc::new(Barrier::new(2));

    let writer = {
        let container = container.clone();
        let registered = registered.clone();
        thread::spawn(move || {
            let child = container.create_scope().unwrap();
            container.set_current_scope(child).unwrap();
            container
                .register("Job.Id", Behavior::constant(Value::new(7u64)))
                .unwrap();
            registered.wait();
            *container.resolve_as::<u64>("Job.Id", &[]).unwrap()
        })
    };

    registered.wait();
    assert_not_found!(container, "Job.Id");
    assert_eq!(writer.join().unwrap(), 7);
}

#[test]
fn root_registrations_are_visible_everywhere() {
    let container = Container::new();
    container
        .register("Game.Rules", Behavior::constant(Value::from("classic")))
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let container = container.clone();
            thread::spawn(move || {
                let child = container.create_scope().unwrap();
                container.set_current_scope(child).unwrap();
                container
                    .resolve("Game.Rules", &[])
                    .unwrap()
                    .as_str()
                    .map(str::to_string)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().as_deref(), Some("classic"));
    }
}

#[test]
fn parent_of_root_fails_on_every_thread() {
    let container = Container::new();
    let root_id = container.root_scope().id();

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let container = container.clone();
            thread::spawn(move || container.parent_scope(None).unwrap_err())
        })
        .collect();

    for handle in handles {
        let err = handle.join().unwrap();
        assert!(matches!(err, IocError::NoParent { scope } if scope == root_id));
    }
}

#[test]
fn action_binds_the_thread_that_executes_it() {
    let container = Container::new();
    let child = container.create_scope().unwrap();

    let action = container
        .resolve_action(
            ioc_runtime::keys::SCOPE_CURRENT_SET,
            &[Value::from_arc(child.clone())],
        )
        .unwrap();

    let on_child = {
        let container = container.clone();
        thread::spawn(move || {
            action.execute().unwrap();
            container.current_scope().unwrap().id()
        })
        .join()
        .unwrap()
    };

    assert_eq!(on_child, child.id());
    assert!(container.is_root(&container.current_scope().unwrap()));
}

#[test]
fn concurrent_registration_into_root_is_lossless() {
    let container = Container::new();
    let start = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let container = container.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                for j in 0..25 {
                    container
                        .register(format!("Worker.{i}.{j}"), Behavior::constant(Value::unit()))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        container.root_scope().len(),
        ioc_runtime::keys::BUILTIN_KEYS.len() + 8 * 25
    );
}

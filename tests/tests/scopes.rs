use ioc_runtime::keys;
use ioc_runtime::{Behavior, Container, IocError, Scope, Value};
use ioc_testing::{assert_not_found, assert_scope_len, init_tracing};

#[test]
fn fresh_container_exposes_exactly_the_builtins() {
    init_tracing();
    let container = Container::new();

    let current = container
        .resolve(keys::SCOPE_CURRENT, &[])
        .unwrap()
        .downcast::<Scope>()
        .unwrap();

    assert_scope_len!(current, keys::BUILTIN_KEYS.len());
    for key in keys::BUILTIN_KEYS {
        assert!(current.contains_key(key), "missing built-in {key}");
    }
    assert!(current.keys().iter().all(|k| keys::is_builtin(k)));
}

#[test]
fn explicit_parent_is_returned_by_identity() {
    let container = Container::new();
    let parent = container.create_empty_scope().unwrap();

    let child = container
        .resolve(keys::SCOPE_CREATE, &[Value::from_arc(parent.clone())])
        .unwrap();
    let resolved = container
        .resolve(keys::SCOPE_PARENT, &[child])
        .unwrap()
        .downcast::<Scope>()
        .unwrap();

    assert!(std::sync::Arc::ptr_eq(&resolved, &parent));
}

#[test]
fn clear_empties_children_and_spares_the_root() {
    let container = Container::new();
    let child = container.create_scope().unwrap();
    container.set_current_scope(child.clone()).unwrap();
    container
        .register("Ship.Fuel", Behavior::constant(Value::new(100u32)))
        .unwrap();
    container
        .register("Ship.Crew", Behavior::constant(Value::new(4u32)))
        .unwrap();
    assert_scope_len!(child, 2);

    container.clear_scope(child.clone()).unwrap();
    assert_scope_len!(child, 0);

    let root = container.root_scope();
    let before = root.len();
    container.clear_scope(root.clone()).unwrap();
    assert_scope_len!(root, before);
}

#[test]
fn register_and_unregister_change_size_by_one() {
    let container = Container::new();
    let child = container.create_scope().unwrap();
    container.set_current_scope(child.clone()).unwrap();

    container
        .register("Ship.Speed", Behavior::constant(Value::new(1u32)))
        .unwrap();
    assert_scope_len!(child, 1);

    // Overwriting keeps the size and swaps the behavior.
    container
        .register("Ship.Speed", Behavior::constant(Value::new(2u32)))
        .unwrap();
    assert_scope_len!(child, 1);
    assert_eq!(*container.resolve_as::<u32>("Ship.Speed", &[]).unwrap(), 2);

    container.unregister("Ship.Speed").unwrap();
    assert_scope_len!(child, 0);
    assert_not_found!(container, "Ship.Speed");
}

#[test]
fn child_shadows_parent_and_falls_back_after_unregister() {
    let container = Container::new();
    container
        .register("Ship.Name", Behavior::constant(Value::from("root")))
        .unwrap();

    let child = container.create_scope().unwrap();
    container.set_current_scope(child).unwrap();
    container
        .register("Ship.Name", Behavior::constant(Value::from("child")))
        .unwrap();
    assert_eq!(container.resolve("Ship.Name", &[]).unwrap().as_str(), Some("child"));

    container.unregister("Ship.Name").unwrap();
    assert_eq!(container.resolve("Ship.Name", &[]).unwrap().as_str(), Some("root"));
}

#[test]
fn empty_scope_cannot_reach_the_builtins() {
    let container = Container::new();
    let island = container.create_empty_scope().unwrap();
    container.set_current_scope(island.clone()).unwrap();

    // Every built-in, including the one that would switch back, is out of reach.
    assert_not_found!(container, keys::SCOPE_CURRENT);
    assert!(container.set_current_scope(container.root_scope()).is_err());

    container.reset();
    assert!(container.is_root(&container.current_scope().unwrap()));
}

#[test]
fn parent_of_the_root_fails() {
    let container = Container::new();
    let err = container.parent_scope(None).unwrap_err();
    let root_id = container.root_scope().id();
    assert!(matches!(err, IocError::NoParent { scope } if scope == root_id));
}

#[test]
fn nested_scopes_resolve_through_every_ancestor() {
    let container = Container::new();
    container
        .register("Ship.Hull", Behavior::constant(Value::from("steel")))
        .unwrap();

    let mut current = container.root_scope();
    for _ in 0..5 {
        current = container.create_scope_with_parent(current).unwrap();
    }
    assert_eq!(current.depth(), 5);

    container.set_current_scope(current).unwrap();
    assert_eq!(container.resolve("Ship.Hull", &[]).unwrap().as_str(), Some("steel"));
}

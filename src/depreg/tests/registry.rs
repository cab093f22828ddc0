use std::sync::Arc;

use depreg::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Instance {
    id: u32,
}

static INSTANCE: DependencyKey<Instance> =
    DependencyKey::with_default("instance", || Instance { id: 0 });

static SHARED: DependencyKey<Arc<Instance>> = DependencyKey::new("shared");

#[test]
fn register_overwrite_unregister_scenario() {
    let registry = Registry::new();

    registry.register(&INSTANCE, Instance { id: 1 });
    assert_eq!(registry.resolve(&INSTANCE).unwrap().id, 1);

    registry.register(&INSTANCE, Instance { id: 2 });
    assert_eq!(registry.resolve(&INSTANCE).unwrap().id, 2);

    assert!(registry.unregister(&INSTANCE));
    assert_eq!(registry.resolve(&INSTANCE).unwrap().id, 0);
}

#[test]
fn child_falls_back_to_parent_and_shadows_it() {
    let parent = Registry::new();
    let child = parent.child();

    parent.register(&INSTANCE, Instance { id: 10 });
    assert_eq!(child.resolve(&INSTANCE).unwrap().id, 10);
    assert!(!child.contains(&INSTANCE));

    child.register(&INSTANCE, Instance { id: 20 });
    assert_eq!(child.resolve(&INSTANCE).unwrap().id, 20);
    assert_eq!(parent.resolve(&INSTANCE).unwrap().id, 10);

    child.unregister(&INSTANCE);
    assert_eq!(child.resolve(&INSTANCE).unwrap().id, 10);

    parent.unregister(&INSTANCE);
    assert_eq!(child.resolve(&INSTANCE).unwrap().id, 0);
    assert!(child.contains(&INSTANCE));
    assert!(!parent.contains(&INSTANCE));
}

#[test]
fn lookup_walks_the_whole_parent_chain() {
    let root = Registry::builder().label("root").build();
    let middle = root.child();
    let leaf = middle.child();

    root.register(&SHARED, Arc::new(Instance { id: 3 }));
    assert_eq!(leaf.resolve(&SHARED).unwrap().id, 3);
    assert!(leaf.is_empty());
    assert!(middle.is_empty());
}

#[test]
fn shared_instances_resolve_to_the_same_allocation() {
    let registry = Registry::new();
    let shared = Arc::new(Instance { id: 5 });
    registry.register(&SHARED, Arc::clone(&shared));

    let first = registry.resolve(&SHARED).unwrap();
    let second = registry.child().resolve(&SHARED).unwrap();
    assert!(Arc::ptr_eq(&first, &shared));
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn plain_values_resolve_to_equal_copies() {
    let registry = Registry::new();
    registry.register(&INSTANCE, Instance { id: 6 });

    let mut copy = registry.resolve(&INSTANCE).unwrap();
    assert_eq!(copy, Instance { id: 6 });
    copy.id = 7;
    assert_eq!(registry.resolve(&INSTANCE).unwrap(), Instance { id: 6 });
}

#[test]
fn missing_required_dependency_is_an_error() {
    let registry = Registry::new();

    let err = registry.resolve(&SHARED).unwrap_err();
    assert!(matches!(err, ResolveError::NotRegistered { key: "shared", .. }));
    assert!(err.to_string().contains("shared"));
}

#[test]
fn unregister_all_clears_local_entries_only() {
    let parent = Registry::new();
    let child = parent.child();
    parent.register(&SHARED, Arc::new(Instance { id: 1 }));
    child.register(&SHARED, Arc::new(Instance { id: 2 }));
    child.register(&INSTANCE, Instance { id: 3 });

    child.unregister_all();
    assert!(child.is_empty());
    assert_eq!(child.resolve(&SHARED).unwrap().id, 1);
    assert_eq!(child.resolve(&INSTANCE).unwrap().id, 0);
    assert_eq!(parent.len(), 1);
}

#[test]
fn keys_with_the_same_name_share_a_slot() {
    let registry = Registry::new();
    let declared_here = DependencyKey::<Instance>::new("instance");

    registry.register(&declared_here, Instance { id: 8 });
    assert_eq!(registry.resolve(&INSTANCE).unwrap().id, 8);
    assert!(registry.unregister(&INSTANCE));
    assert!(!registry.contains(&declared_here));
}

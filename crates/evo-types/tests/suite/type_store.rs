use evo_types::{ClassDef, ClassKind, Type, TypeEnv, TypeParamOwner, TypeStore};

use pretty_assertions::assert_eq;

fn plain_class(name: &str) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Class,
        is_abstract: false,
        is_public: true,
        type_params: vec![],
        super_class: None,
        interfaces: vec![],
    }
}

#[test]
fn intern_class_id_is_idempotent() {
    let mut store = TypeStore::default();
    let first = store.intern_class_id("com.example.Foo");
    let second = store.intern_class_id("com.example.Foo");
    assert_eq!(first, second);
}

#[test]
fn define_class_overwrites_placeholder() {
    let mut store = TypeStore::default();
    let id = store.intern_class_id("com.example.Box");
    let object = Type::class(store.well_known().object, vec![]);
    let t = store.add_owned_type_param("T", TypeParamOwner::Class(id), vec![object.clone()]);

    store.define_class(
        id,
        ClassDef {
            type_params: vec![t],
            super_class: Some(object),
            ..plain_class("com.example.Box")
        },
    );

    assert_eq!(store.class_id("com.example.Box"), Some(id));
    let def = store.class(id).expect("class should be defined");
    assert_eq!(def.type_params, vec![t]);
    assert_eq!(store.type_param(t).unwrap().owner, TypeParamOwner::Class(id));
}

#[test]
fn add_class_with_existing_name_keeps_id() {
    let mut store = TypeStore::default();
    let first = store.add_class(plain_class("com.example.Bar"));
    let second = store.add_class(ClassDef {
        is_abstract: true,
        ..plain_class("com.example.Bar")
    });

    assert_eq!(first, second);
    assert!(store.class(first).unwrap().is_abstract);
    assert!(!store.class(first).unwrap().is_instantiable());
}

#[test]
fn class_ids_enumerate_every_definition() {
    let mut store = TypeStore::default();
    let before = store.class_ids().count();
    let id = store.add_class(plain_class("com.example.Baz"));

    let ids: Vec<_> = store.class_ids().collect();
    assert_eq!(ids.len(), before + 1);
    assert_eq!(ids.last(), Some(&id));
}

use crate::{
    ClassDef, ClassId, ClassKind, Type, TypeParamOwner, TypeStore, TypeVarId, WellKnownTypes,
};

impl TypeStore {
    /// A store pre-populated with the handful of `java.lang` / `java.util` classes the generator
    /// relies on (default candidates, common bounds, collection hierarchy).
    ///
    /// The model is hand-written and intentionally small: members are not modelled, only the
    /// declarations needed to answer erasure and subtyping questions.
    pub fn with_minimal_jdk() -> Self {
        let placeholder = ClassId::from_raw(0);
        let mut store = TypeStore::empty(WellKnownTypes {
            object: placeholder,
            string: placeholder,
            integer: placeholder,
            number: placeholder,
            enum_: placeholder,
            cloneable: placeholder,
            serializable: placeholder,
        });

        let object = store.add_class(class_def("java.lang.Object", None, vec![]));
        let object_ty = Type::class(object, vec![]);

        let serializable = store.add_class(interface_def("java.io.Serializable", vec![], vec![]));
        let cloneable = store.add_class(interface_def("java.lang.Cloneable", vec![], vec![]));
        store.add_class(interface_def("java.lang.Runnable", vec![], vec![]));
        let char_sequence =
            store.add_class(interface_def("java.lang.CharSequence", vec![], vec![]));

        // interface Comparable<T>
        let comparable = store.intern_class_id("java.lang.Comparable");
        let comparable_t = owned_param(&mut store, "T", comparable, vec![object_ty.clone()]);
        store.define_class(
            comparable,
            interface_def("java.lang.Comparable", vec![comparable_t], vec![]),
        );
        let comparable_of = |ty: Type| Type::class(comparable, vec![ty]);

        let string = store.intern_class_id("java.lang.String");
        store.define_class(
            string,
            class_def(
                "java.lang.String",
                Some(object_ty.clone()),
                vec![
                    Type::class(serializable, vec![]),
                    comparable_of(Type::class(string, vec![])),
                    Type::class(char_sequence, vec![]),
                ],
            ),
        );

        let number = store.add_class(ClassDef {
            is_abstract: true,
            ..class_def(
                "java.lang.Number",
                Some(object_ty.clone()),
                vec![Type::class(serializable, vec![])],
            )
        });

        let boxed = |store: &mut TypeStore, name: &str, super_class: ClassId| {
            let id = store.intern_class_id(name);
            store.define_class(
                id,
                class_def(
                    name,
                    Some(Type::class(super_class, vec![])),
                    vec![comparable_of(Type::class(id, vec![]))],
                ),
            );
            id
        };
        let integer = boxed(&mut store, "java.lang.Integer", number);
        boxed(&mut store, "java.lang.Long", number);
        boxed(&mut store, "java.lang.Double", number);
        let boolean = boxed(&mut store, "java.lang.Boolean", object);
        if let Some(def) = store.class_mut(boolean) {
            def.interfaces.push(Type::class(serializable, vec![]));
        }

        // abstract class Enum<E extends Enum<E>> implements Comparable<E>, Serializable
        let enum_ = store.intern_class_id("java.lang.Enum");
        let enum_e = owned_param(&mut store, "E", enum_, vec![]);
        if let Some(tp) = store.type_param_mut(enum_e) {
            tp.upper_bounds = vec![Type::class(enum_, vec![Type::TypeVar(enum_e)])];
        }
        store.define_class(
            enum_,
            ClassDef {
                is_abstract: true,
                type_params: vec![enum_e],
                ..class_def(
                    "java.lang.Enum",
                    Some(object_ty.clone()),
                    vec![
                        comparable_of(Type::TypeVar(enum_e)),
                        Type::class(serializable, vec![]),
                    ],
                )
            },
        );

        // Collections.
        let iterable = generic_interface(&mut store, "java.lang.Iterable", &object_ty, None);
        let collection =
            generic_interface(&mut store, "java.util.Collection", &object_ty, Some(iterable));
        let list = generic_interface(&mut store, "java.util.List", &object_ty, Some(collection));

        let abstract_collection = generic_class(
            &mut store,
            "java.util.AbstractCollection",
            &object_ty,
            GenericClassShape {
                is_abstract: true,
                super_class: None,
                interfaces: vec![collection],
                extra_interfaces: vec![],
            },
        );
        let abstract_list = generic_class(
            &mut store,
            "java.util.AbstractList",
            &object_ty,
            GenericClassShape {
                is_abstract: true,
                super_class: Some(abstract_collection),
                interfaces: vec![list],
                extra_interfaces: vec![],
            },
        );
        for name in ["java.util.ArrayList", "java.util.LinkedList"] {
            generic_class(
                &mut store,
                name,
                &object_ty,
                GenericClassShape {
                    is_abstract: false,
                    super_class: Some(abstract_list),
                    interfaces: vec![list],
                    extra_interfaces: vec![
                        Type::class(cloneable, vec![]),
                        Type::class(serializable, vec![]),
                    ],
                },
            );
        }

        // interface Map<K, V>; class HashMap<K, V> implements Map<K, V>
        let map = store.intern_class_id("java.util.Map");
        let map_k = owned_param(&mut store, "K", map, vec![object_ty.clone()]);
        let map_v = owned_param(&mut store, "V", map, vec![object_ty.clone()]);
        store.define_class(map, interface_def("java.util.Map", vec![map_k, map_v], vec![]));

        let hash_map = store.intern_class_id("java.util.HashMap");
        let hash_map_k = owned_param(&mut store, "K", hash_map, vec![object_ty.clone()]);
        let hash_map_v = owned_param(&mut store, "V", hash_map, vec![object_ty.clone()]);
        store.define_class(
            hash_map,
            ClassDef {
                type_params: vec![hash_map_k, hash_map_v],
                ..class_def(
                    "java.util.HashMap",
                    Some(object_ty.clone()),
                    vec![
                        Type::class(
                            map,
                            vec![Type::TypeVar(hash_map_k), Type::TypeVar(hash_map_v)],
                        ),
                        Type::class(cloneable, vec![]),
                        Type::class(serializable, vec![]),
                    ],
                )
            },
        );

        store.well_known = WellKnownTypes {
            object,
            string,
            integer,
            number,
            enum_,
            cloneable,
            serializable,
        };
        store
    }
}

struct GenericClassShape {
    is_abstract: bool,
    super_class: Option<ClassId>,
    /// Generic interfaces instantiated with the class's own type parameter.
    interfaces: Vec<ClassId>,
    extra_interfaces: Vec<Type>,
}

/// `class Name<E> extends Super<E> implements I<E>, ...`
fn generic_class(
    store: &mut TypeStore,
    name: &str,
    object_ty: &Type,
    shape: GenericClassShape,
) -> ClassId {
    let id = store.intern_class_id(name);
    let e = owned_param(store, "E", id, vec![object_ty.clone()]);
    let e_ty = Type::TypeVar(e);
    let super_class = match shape.super_class {
        Some(sc) => Type::class(sc, vec![e_ty.clone()]),
        None => object_ty.clone(),
    };
    let mut interfaces: Vec<Type> = shape
        .interfaces
        .into_iter()
        .map(|iface| Type::class(iface, vec![e_ty.clone()]))
        .collect();
    interfaces.extend(shape.extra_interfaces);
    store.define_class(
        id,
        ClassDef {
            is_abstract: shape.is_abstract,
            type_params: vec![e],
            ..class_def(name, Some(super_class), interfaces)
        },
    );
    id
}

/// `interface Name<T> extends Super<T>`
fn generic_interface(
    store: &mut TypeStore,
    name: &str,
    object_ty: &Type,
    super_interface: Option<ClassId>,
) -> ClassId {
    let id = store.intern_class_id(name);
    let t = owned_param(store, "T", id, vec![object_ty.clone()]);
    let interfaces = super_interface
        .map(|sup| vec![Type::class(sup, vec![Type::TypeVar(t)])])
        .unwrap_or_default();
    store.define_class(id, interface_def(name, vec![t], interfaces));
    id
}

fn owned_param(store: &mut TypeStore, name: &str, owner: ClassId, bounds: Vec<Type>) -> TypeVarId {
    store.add_owned_type_param(name, TypeParamOwner::Class(owner), bounds)
}

fn class_def(name: &str, super_class: Option<Type>, interfaces: Vec<Type>) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Class,
        is_abstract: false,
        is_public: true,
        type_params: Vec::new(),
        super_class,
        interfaces,
    }
}

fn interface_def(name: &str, type_params: Vec<TypeVarId>, interfaces: Vec<Type>) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Interface,
        is_abstract: true,
        is_public: true,
        type_params,
        super_class: None,
        interfaces,
    }
}

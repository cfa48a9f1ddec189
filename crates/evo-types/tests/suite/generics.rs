use evo_types::{
    erasure, format_type, instantiate_as_supertype, is_subtype, replace_type_vars_with_wildcards,
    substitute, ClassDef, ClassKind, Type, TypeEnv, TypeStore, WildcardType,
};
use std::collections::HashMap;

use pretty_assertions::assert_eq;

#[test]
fn inheritance_type_arg_substitution() {
    let env = TypeStore::with_minimal_jdk();

    let array_list = env.class_id("java.util.ArrayList").unwrap();
    let list = env.class_id("java.util.List").unwrap();
    let string = env.well_known().string;
    let object = env.well_known().object;

    let array_list_string = Type::class(array_list, vec![Type::class(string, vec![])]);
    let list_string = Type::class(list, vec![Type::class(string, vec![])]);
    let list_object = Type::class(list, vec![Type::class(object, vec![])]);

    assert!(is_subtype(&env, &array_list_string, &list_string));
    assert!(!is_subtype(&env, &array_list_string, &list_object));
}

#[test]
fn instantiate_as_supertype_walks_abstract_bases() {
    let env = TypeStore::with_minimal_jdk();
    let linked_list = env.class_id("java.util.LinkedList").unwrap();
    let iterable = env.class_id("java.lang.Iterable").unwrap();
    let integer = Type::class(env.well_known().integer, vec![]);

    let view = instantiate_as_supertype(
        &env,
        &Type::class(linked_list, vec![integer.clone()]),
        iterable,
    );
    assert_eq!(view, Some(Type::class(iterable, vec![integer])));
}

#[test]
fn wildcard_containment_follows_bounds() {
    let env = TypeStore::with_minimal_jdk();
    let list = env.class_id("java.util.List").unwrap();
    let array_list = env.class_id("java.util.ArrayList").unwrap();
    let wk = env.well_known();
    let integer = Type::class(wk.integer, vec![]);
    let number = Type::class(wk.number, vec![]);
    let string = Type::class(wk.string, vec![]);

    let list_extends_number =
        Type::class(list, vec![Type::Wildcard(WildcardType::extends(number.clone()))]);
    let list_super_integer =
        Type::class(list, vec![Type::Wildcard(WildcardType::super_of(integer.clone()))]);

    let array_list_integer = Type::class(array_list, vec![integer.clone()]);
    let array_list_number = Type::class(array_list, vec![number.clone()]);
    let array_list_string = Type::class(array_list, vec![string]);

    assert!(is_subtype(&env, &array_list_integer, &list_extends_number));
    assert!(!is_subtype(&env, &array_list_string, &list_extends_number));
    assert!(is_subtype(&env, &array_list_number, &list_super_integer));
    assert!(is_subtype(&env, &array_list_integer, &list_super_integer));
    assert!(!is_subtype(&env, &array_list_string, &list_super_integer));
}

#[test]
fn enum_constants_satisfy_self_referential_enum_bound() {
    let mut env = TypeStore::with_minimal_jdk();
    let enum_ = env.well_known().enum_;
    let object = Type::class(env.well_known().object, vec![]);

    let color = env.intern_class_id("com.example.Color");
    env.define_class(
        color,
        ClassDef {
            name: "com.example.Color".to_string(),
            kind: ClassKind::Enum,
            is_abstract: false,
            is_public: true,
            type_params: vec![],
            super_class: Some(Type::class(enum_, vec![Type::class(color, vec![])])),
            interfaces: vec![],
        },
    );

    let color_ty = Type::class(color, vec![]);
    let bound = Type::class(enum_, vec![color_ty.clone()]);
    assert!(is_subtype(&env, &color_ty, &bound));
    assert!(!is_subtype(&env, &object, &bound));
}

#[test]
fn widening_unresolved_bound_variables() {
    let mut env = TypeStore::with_minimal_jdk();
    let list = env.class_id("java.util.List").unwrap();
    let array_list = env.class_id("java.util.ArrayList").unwrap();
    let e = env.add_type_param("E", vec![]);
    let f = env.add_type_param("F", vec![]);
    let string = Type::class(env.well_known().string, vec![]);

    let bound = Type::class(list, vec![Type::TypeVar(e)]);
    let widened = replace_type_vars_with_wildcards(&bound);
    assert_eq!(format_type(&env, &widened), "java.util.List<?>");
    assert!(is_subtype(
        &env,
        &Type::class(array_list, vec![string.clone()]),
        &widened
    ));

    let subst = HashMap::from([(e, string.clone())]);
    let bound_f = Type::class(list, vec![Type::TypeVar(f)]);
    assert_eq!(substitute(&bound, &subst), Type::class(list, vec![string]));
    assert_eq!(substitute(&bound_f, &subst), bound_f);
}

#[test]
fn erasure_drops_type_arguments_and_wildcards() {
    let env = TypeStore::with_minimal_jdk();
    let list = env.class_id("java.util.List").unwrap();
    let number = Type::class(env.well_known().number, vec![]);

    let ty = Type::class(list, vec![Type::Wildcard(WildcardType::extends(number.clone()))]);
    assert_eq!(erasure(&env, &ty), Type::class(list, vec![]));
    assert_eq!(
        erasure(&env, &Type::Wildcard(WildcardType::extends(number.clone()))),
        number
    );
    assert_eq!(
        erasure(&env, &Type::wildcard()),
        Type::class(env.well_known().object, vec![])
    );
}

use std::collections::{HashMap, HashSet};

use crate::{ClassId, ClassType, Type, TypeEnv, TypeVarId, WildcardType};

/// Replace type variables according to `subst`. Variables without a mapping are kept.
///
/// Substitution is a single pass: replacements are not themselves re-substituted, so a mapping
/// such as `E -> List<E>` cannot loop.
pub fn substitute(ty: &Type, subst: &HashMap<TypeVarId, Type>) -> Type {
    substitute_with(ty, &mut |id| subst.get(&id).cloned())
}

/// Like [`substitute`] with the mapping supplied as a closure.
pub fn substitute_with(ty: &Type, lookup: &mut dyn FnMut(TypeVarId) -> Option<Type>) -> Type {
    match ty {
        Type::TypeVar(id) => lookup(*id).unwrap_or_else(|| ty.clone()),
        Type::Class(ClassType { def, args }) => Type::class(
            *def,
            args.iter().map(|arg| substitute_with(arg, lookup)).collect(),
        ),
        Type::Wildcard(w) => Type::Wildcard(WildcardType {
            upper_bounds: w
                .upper_bounds
                .iter()
                .map(|b| substitute_with(b, lookup))
                .collect(),
            lower_bounds: w
                .lower_bounds
                .iter()
                .map(|b| substitute_with(b, lookup))
                .collect(),
        }),
        Type::Array(elem) => Type::array(substitute_with(elem, lookup)),
        Type::Primitive(_) | Type::Null => ty.clone(),
    }
}

/// Replace every remaining type variable with an unbounded wildcard.
///
/// Used to check a bound that still mentions unresolved variables: `List<E>` with `E` unknown is
/// checked as `List<?>`.
pub fn replace_type_vars_with_wildcards(ty: &Type) -> Type {
    substitute_with(ty, &mut |_| Some(Type::wildcard()))
}

/// Whether a wildcard or type variable appears anywhere in `ty`.
pub fn is_open(ty: &Type) -> bool {
    match ty {
        Type::TypeVar(_) | Type::Wildcard(_) => true,
        Type::Class(ClassType { args, .. }) => args.iter().any(is_open),
        Type::Array(elem) => is_open(elem),
        Type::Primitive(_) | Type::Null => false,
    }
}

/// Whether `tv` occurs anywhere in `ty` (including inside wildcard bounds).
pub fn contains_type_var(ty: &Type, tv: TypeVarId) -> bool {
    match ty {
        Type::TypeVar(id) => *id == tv,
        Type::Class(ClassType { args, .. }) => args.iter().any(|arg| contains_type_var(arg, tv)),
        Type::Wildcard(w) => w
            .upper_bounds
            .iter()
            .chain(w.lower_bounds.iter())
            .any(|b| contains_type_var(b, tv)),
        Type::Array(elem) => contains_type_var(elem, tv),
        Type::Primitive(_) | Type::Null => false,
    }
}

/// Whether `tv` is itself one of the type arguments of `ty` (`Comparable<T>` for `T`).
pub fn mentions_type_var_directly(ty: &Type, tv: TypeVarId) -> bool {
    match ty {
        Type::Class(ClassType { args, .. }) => {
            args.iter().any(|arg| matches!(arg, Type::TypeVar(id) if *id == tv))
        }
        _ => false,
    }
}

/// Type erasure (JLS 4.6).
///
/// Type variables erase to the erasure of their leftmost bound, wildcards to their first upper
/// bound. Cyclic bounds (`A extends B`, `B extends A`) erase to `Object`.
pub fn erasure(env: &dyn TypeEnv, ty: &Type) -> Type {
    fn inner(env: &dyn TypeEnv, ty: &Type, seen: &mut HashSet<TypeVarId>) -> Type {
        let object = || Type::class(env.well_known().object, vec![]);
        match ty {
            Type::Class(ClassType { def, .. }) => Type::class(*def, vec![]),
            Type::TypeVar(id) => {
                if !seen.insert(*id) {
                    return object();
                }
                let out = env
                    .type_param(*id)
                    .and_then(|tp| tp.upper_bounds.first())
                    .map(|bound| inner(env, bound, seen))
                    .unwrap_or_else(object);
                seen.remove(id);
                out
            }
            Type::Wildcard(w) => w
                .upper_bounds
                .first()
                .map(|bound| inner(env, bound, seen))
                .unwrap_or_else(object),
            Type::Array(elem) => Type::array(inner(env, elem, seen)),
            Type::Primitive(_) | Type::Null => ty.clone(),
        }
    }

    inner(env, ty, &mut HashSet::new())
}

/// The class `ty` erases to, or `None` when the erasure is not a class (arrays, primitives,
/// `null`).
pub fn erased_class(env: &dyn TypeEnv, ty: &Type) -> Option<ClassId> {
    match erasure(env, ty) {
        Type::Class(ClassType { def, .. }) => Some(def),
        _ => None,
    }
}

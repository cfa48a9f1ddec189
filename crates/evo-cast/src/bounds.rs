use std::collections::HashMap;

use evo_types::{
    erased_class, erasure, format_type, instantiate_as_supertype, is_open, is_subtype,
    is_unbounded_wildcard, replace_type_vars_with_wildcards, substitute_with, ClassId, ClassKind,
    ClassType, Type, TypeEnv, TypeVarId, WildcardType,
};

use crate::OwnerBindings;

/// A type shape that still needs a concrete class chosen for it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpenType {
    TypeVar(TypeVarId),
    Wildcard(WildcardType),
}

impl OpenType {
    pub fn from_type(ty: &Type) -> Option<Self> {
        match ty {
            Type::TypeVar(id) => Some(OpenType::TypeVar(*id)),
            Type::Wildcard(w) => Some(OpenType::Wildcard(w.clone())),
            _ => None,
        }
    }

    pub fn to_type(&self) -> Type {
        match self {
            OpenType::TypeVar(id) => Type::TypeVar(*id),
            OpenType::Wildcard(w) => Type::Wildcard(w.clone()),
        }
    }

    /// Declared upper bounds. Empty means `Object`.
    pub fn upper_bounds(&self, env: &dyn TypeEnv) -> Vec<Type> {
        match self {
            OpenType::TypeVar(id) => env
                .type_param(*id)
                .map(|tp| tp.upper_bounds.clone())
                .unwrap_or_default(),
            OpenType::Wildcard(w) => w.upper_bounds.clone(),
        }
    }

    pub fn lower_bounds(&self, env: &dyn TypeEnv) -> Vec<Type> {
        match self {
            OpenType::TypeVar(id) => env
                .type_param(*id)
                .and_then(|tp| tp.lower_bound.clone())
                .into_iter()
                .collect(),
            OpenType::Wildcard(w) => w.lower_bounds.clone(),
        }
    }

    /// `extends X` / `super Y` renderings of every bound, for diagnostics.
    pub(crate) fn describe_bounds(&self, env: &dyn TypeEnv) -> Vec<String> {
        let upper = self
            .upper_bounds(env)
            .into_iter()
            .map(|b| format!("extends {}", format_type(env, &b)));
        let lower = self
            .lower_bounds(env)
            .into_iter()
            .map(|b| format!("super {}", format_type(env, &b)));
        upper.chain(lower).collect()
    }
}

impl From<TypeVarId> for OpenType {
    fn from(id: TypeVarId) -> Self {
        OpenType::TypeVar(id)
    }
}

impl From<WildcardType> for OpenType {
    fn from(w: WildcardType) -> Self {
        OpenType::Wildcard(w)
    }
}

/// Whether `candidate` may be substituted for `open` given what the enclosing context has bound.
///
/// Bounds are closed before checking: owner bindings are applied, a type variable's own
/// occurrences in its bound are replaced by the candidate (`T extends Comparable<T>` checks
/// `Integer` against `Comparable<Integer>`), and whatever variables remain become `?`.
///
/// `bindings` must already be sanitized.
pub fn satisfies_bounds(
    env: &dyn TypeEnv,
    candidate: &ClassType,
    open: &OpenType,
    bindings: &OwnerBindings,
) -> bool {
    let candidate_ty = candidate.to_type();
    match open {
        OpenType::TypeVar(tv) => {
            let Some(tp) = env.type_param(*tv) else {
                return false;
            };
            if let Some(bound) = bindings.get(*tv) {
                if !is_subtype(env, &candidate_ty, &close(bindings, bound, None)) {
                    return false;
                }
            }

            let is_enum = env
                .class(candidate.def)
                .is_some_and(|def| def.kind == ClassKind::Enum);
            let enum_class = env.well_known().enum_;
            let uppers_ok = tp.upper_bounds.iter().all(|upper| {
                // `E extends Enum<E>` accepts every enum without unrolling the bound.
                if is_enum && erased_class(env, upper) == Some(enum_class) {
                    return true;
                }
                let bound = close(bindings, upper, Some((*tv, &candidate_ty)));
                is_subtype(env, &candidate_ty, &bound)
            });
            uppers_ok
                && tp
                    .lower_bound
                    .iter()
                    .all(|lower| lower_bound_ok(env, &candidate_ty, lower, bindings))
        }
        OpenType::Wildcard(w) => {
            w.upper_bounds
                .iter()
                .all(|upper| is_subtype(env, &candidate_ty, &close(bindings, upper, None)))
                && w
                    .lower_bounds
                    .iter()
                    .all(|lower| lower_bound_ok(env, &candidate_ty, lower, bindings))
        }
    }
}

fn close(bindings: &OwnerBindings, ty: &Type, self_subst: Option<(TypeVarId, &Type)>) -> Type {
    let mut bound = bindings.apply(ty);
    if let Some((tv, candidate)) = self_subst {
        bound = substitute_with(&bound, &mut |var| (var == tv).then(|| candidate.clone()));
    }
    replace_type_vars_with_wildcards(&bound)
}

// An open lower bound can only be compared by erasure.
fn lower_bound_ok(env: &dyn TypeEnv, candidate: &Type, lower: &Type, bindings: &OwnerBindings) -> bool {
    let lower = bindings.apply(lower);
    if is_open(&lower) {
        return is_subtype(env, &erasure(env, &lower), &erasure(env, candidate));
    }
    is_subtype(env, &lower, candidate)
}

/// Instantiate the generic class `sub` so that it is a subtype of `target`.
///
/// `ArrayList` against `List<String>` gives `ArrayList<String>`. Raw or all-`?` targets give the
/// raw class. A wildcard argument is carried over as is, so `List<? extends Number>` gives the
/// open `ArrayList<? extends Number>` whose wildcard is resolved later. Returns `None` when the
/// arguments cannot be inferred from the supertype path.
pub fn parameterize_as(env: &dyn TypeEnv, sub: ClassId, target: &ClassType) -> Option<ClassType> {
    let def = env.class(sub)?;
    if def.type_params.is_empty()
        || target.args.is_empty()
        || target.args.iter().all(|arg| is_unbounded_wildcard(env, arg))
    {
        return Some(ClassType::raw(sub));
    }

    let generic = Type::class(
        sub,
        def.type_params.iter().map(|p| Type::TypeVar(*p)).collect(),
    );
    let Type::Class(view) = instantiate_as_supertype(env, &generic, target.def)? else {
        return None;
    };
    if view.args.len() != target.args.len() {
        return None;
    }

    let mut solved: HashMap<TypeVarId, Type> = HashMap::new();
    for (formal, actual) in view.args.iter().zip(&target.args) {
        match formal {
            Type::TypeVar(param) if def.type_params.contains(param) => {
                if let Some(prev) = solved.insert(*param, actual.clone()) {
                    if prev != *actual {
                        return None;
                    }
                }
            }
            other if other == actual => {}
            _ => return None,
        }
    }

    let args = def
        .type_params
        .iter()
        .map(|param| solved.get(param).cloned())
        .collect::<Option<Vec<_>>>()?;
    Some(ClassType::new(sub, args))
}

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{substitute, ClassId, ClassKind, ClassType, Type, TypeEnv, TypeVarId, WildcardType};

/// Upper limit on nested bound expansion during a single subtype query.
///
/// Self-referential bounds (`T extends Comparable<T>`) and F-bounded hierarchies can otherwise
/// expand forever; queries that hit the limit answer `false`.
pub const MAX_BOUND_DEPTH: usize = 32;

/// Direct supertypes of `ty` with the instantiation's type arguments substituted in.
///
/// Raw instantiations yield raw supertypes. Interfaces and root classes report `Object`.
pub fn direct_supertypes(env: &dyn TypeEnv, ty: &ClassType) -> Vec<ClassType> {
    let Some(class_def) = env.class(ty.def) else {
        return Vec::new();
    };
    let object = env.well_known().object;
    let raw = ty.args.is_empty() && !class_def.type_params.is_empty();

    let mut subst: HashMap<TypeVarId, Type> = HashMap::with_capacity(class_def.type_params.len());
    if !raw {
        for (idx, formal) in class_def.type_params.iter().copied().enumerate() {
            subst.insert(formal, ty.args.get(idx).cloned().unwrap_or_else(Type::wildcard));
        }
    }

    let mut out = Vec::new();
    for sup in class_def.super_class.iter().chain(class_def.interfaces.iter()) {
        let Type::Class(sup) = sup else {
            continue;
        };
        if raw {
            out.push(ClassType::raw(sup.def));
        } else if let Type::Class(sup) = substitute(&Type::Class(sup.clone()), &subst) {
            out.push(sup);
        }
    }

    // In Java, every interface implicitly has `Object` as a supertype (JLS 4.10.2).
    if ty.def != object && (class_def.super_class.is_none() || class_def.kind == ClassKind::Interface)
    {
        out.push(ClassType::raw(object));
    }
    out
}

/// Return `ty` viewed as `target` by walking the supertype graph and applying type argument
/// substitution along the way.
///
/// Example: `ArrayList<String>` viewed as `List` is `List<String>`. Raw inputs produce raw
/// results. Type variables and wildcards are viewed through their upper bounds.
pub fn instantiate_as_supertype(env: &dyn TypeEnv, ty: &Type, target: ClassId) -> Option<Type> {
    fn inner(
        env: &dyn TypeEnv,
        ty: &Type,
        target: ClassId,
        seen_type_vars: &mut HashSet<TypeVarId>,
    ) -> Option<Type> {
        match ty {
            Type::Array(_) => {
                let wk = env.well_known();
                if target == wk.object || target == wk.cloneable || target == wk.serializable {
                    return Some(Type::class(target, vec![]));
                }
                None
            }
            Type::TypeVar(id) => {
                if !seen_type_vars.insert(*id) {
                    return None;
                }
                let out = match env.type_param(*id) {
                    Some(tp) if !tp.upper_bounds.is_empty() => tp
                        .upper_bounds
                        .iter()
                        .find_map(|bound| inner(env, bound, target, seen_type_vars)),
                    _ => object_view(env, target),
                };
                seen_type_vars.remove(id);
                out
            }
            Type::Wildcard(w) if w.upper_bounds.is_empty() => object_view(env, target),
            Type::Wildcard(w) => w
                .upper_bounds
                .iter()
                .find_map(|bound| inner(env, bound, target, seen_type_vars)),
            Type::Class(start) => {
                let mut queue: VecDeque<ClassType> = VecDeque::new();
                let mut seen: HashSet<ClassType> = HashSet::new();
                queue.push_back(start.clone());

                while let Some(current) = queue.pop_front() {
                    if !seen.insert(current.clone()) {
                        continue;
                    }
                    if current.def == target {
                        return Some(Type::Class(current));
                    }
                    queue.extend(direct_supertypes(env, &current));
                }
                None
            }
            Type::Primitive(_) | Type::Null => None,
        }
    }

    let mut seen_type_vars = HashSet::new();
    inner(env, ty, target, &mut seen_type_vars)
}

fn object_view(env: &dyn TypeEnv, target: ClassId) -> Option<Type> {
    let object = env.well_known().object;
    (target == object).then(|| Type::class(object, vec![]))
}

/// `?` or `? extends Object`.
pub fn is_unbounded_wildcard(env: &dyn TypeEnv, ty: &Type) -> bool {
    let Type::Wildcard(w) = ty else {
        return false;
    };
    w.lower_bounds.is_empty() && w.upper_bounds.iter().all(|b| is_object(env, b))
}

fn is_object(env: &dyn TypeEnv, ty: &Type) -> bool {
    matches!(ty, Type::Class(ClassType { def, .. }) if *def == env.well_known().object)
}

/// Java subtyping (`sub <: sup`, JLS 4.10) including type argument containment (JLS 4.5.1).
///
/// Raw types are only accepted where no type argument information is lost: a raw `ArrayList` is a
/// subtype of `List` and `List<?>` but not of `List<String>`. Unchecked conversion is deliberately
/// not modelled since generated tests must stay type-safe.
pub fn is_subtype(env: &dyn TypeEnv, sub: &Type, sup: &Type) -> bool {
    Subtyping { env, depth: 0 }.is_subtype(sub, sup)
}

struct Subtyping<'env> {
    env: &'env dyn TypeEnv,
    depth: usize,
}

impl Subtyping<'_> {
    fn is_subtype(&mut self, sub: &Type, sup: &Type) -> bool {
        if sub == sup {
            return true;
        }
        if self.depth >= MAX_BOUND_DEPTH {
            return false;
        }
        self.depth += 1;
        let out = self.is_subtype_uncached(sub, sup);
        self.depth -= 1;
        out
    }

    fn is_subtype_uncached(&mut self, sub: &Type, sup: &Type) -> bool {
        match (sub, sup) {
            (Type::Null, sup) => sup.is_reference(),
            (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,

            // A top-level wildcard target only appears after unresolved variables in a bound have
            // been widened; accept anything within its bounds.
            (_, Type::Wildcard(w)) => self.within_wildcard(sub, w),
            (Type::Wildcard(w), _) => {
                if w.upper_bounds.is_empty() {
                    return is_object(self.env, sup);
                }
                w.upper_bounds.iter().any(|bound| self.is_subtype(bound, sup))
            }

            (_, Type::TypeVar(id)) => {
                let lower = self.env.type_param(*id).and_then(|tp| tp.lower_bound.clone());
                match lower {
                    Some(lower) => self.is_subtype(sub, &lower),
                    None => false,
                }
            }
            (Type::TypeVar(id), _) => {
                let bounds = self
                    .env
                    .type_param(*id)
                    .map(|tp| tp.upper_bounds.clone())
                    .unwrap_or_default();
                if bounds.is_empty() {
                    return is_object(self.env, sup);
                }
                bounds.iter().any(|bound| self.is_subtype(bound, sup))
            }

            (Type::Array(sub_elem), Type::Array(sup_elem)) => {
                match (sub_elem.as_ref(), sup_elem.as_ref()) {
                    (Type::Primitive(a), Type::Primitive(b)) => a == b,
                    (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,
                    (a, b) => self.is_subtype(a, b),
                }
            }
            (Type::Array(_), Type::Class(sup)) => {
                let wk = self.env.well_known();
                sup.def == wk.object || sup.def == wk.cloneable || sup.def == wk.serializable
            }
            (Type::Class(sub), Type::Class(sup)) => self.class_subtype(sub, sup),
            _ => false,
        }
    }

    fn class_subtype(&mut self, sub: &ClassType, sup: &ClassType) -> bool {
        if self.env.class(sub.def).is_none() {
            return false;
        }
        if sup.def == self.env.well_known().object {
            return true;
        }
        let Some(Type::Class(view)) =
            instantiate_as_supertype(self.env, &Type::Class(sub.clone()), sup.def)
        else {
            return false;
        };

        if sup.args.is_empty() {
            return true;
        }
        if view.args.is_empty() {
            return sup.args.iter().all(|arg| is_unbounded_wildcard(self.env, arg));
        }
        if view.args.len() != sup.args.len() {
            return false;
        }
        view.args
            .iter()
            .zip(sup.args.iter())
            .all(|(s, t)| self.contains(t, s))
    }

    /// Type argument containment: `t` contains `s` (JLS 4.5.1).
    fn contains(&mut self, t: &Type, s: &Type) -> bool {
        let Type::Wildcard(tw) = t else {
            return s == t;
        };

        for upper in &tw.upper_bounds {
            if is_object(self.env, upper) {
                continue;
            }
            let ok = match s {
                Type::Wildcard(sw) => sw.upper_bounds.iter().any(|su| self.is_subtype(su, upper)),
                s => self.is_subtype(s, upper),
            };
            if !ok {
                return false;
            }
        }

        for lower in &tw.lower_bounds {
            let ok = match s {
                Type::Wildcard(sw) => sw.lower_bounds.iter().any(|sl| self.is_subtype(lower, sl)),
                s => self.is_subtype(lower, s),
            };
            if !ok {
                return false;
            }
        }
        true
    }

    fn within_wildcard(&mut self, sub: &Type, w: &WildcardType) -> bool {
        w.upper_bounds.iter().all(|upper| self.is_subtype(sub, upper))
            && w.lower_bounds.iter().all(|lower| self.is_subtype(lower, sub))
    }
}

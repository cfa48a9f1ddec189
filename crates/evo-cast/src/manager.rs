use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use evo_config::{DefaultCandidate, GenerationConfig};
use evo_types::{
    erased_class, format_type, is_open, mentions_type_var_directly, ClassKind, ClassType, Type,
    TypeEnv, TypeVarId, WildcardType,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bounds::{parameterize_as, satisfies_bounds, OpenType};
use crate::cluster::TestCluster;
use crate::pool::PrioritizedCandidatePool;
use crate::selection::select_rank_biased;
use crate::{CastError, OwnerBindings};

/// Priority of candidates learned while resolving.
pub const DISCOVERED_PRIORITY: i32 = 10;

/// A registered class type together with its ordering key.
///
/// Identity is the type alone; the parameter count is derived from it.
#[derive(Clone, Debug)]
struct Candidate {
    ty: ClassType,
    type_param_count: usize,
}

impl Candidate {
    fn new(env: &dyn TypeEnv, ty: ClassType) -> Self {
        let type_param_count = env.class(ty.def).map_or(0, |def| def.type_params.len());
        Self {
            ty,
            type_param_count,
        }
    }

    fn is_recursive(&self) -> bool {
        self.ty.args.iter().any(is_open)
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for Candidate {}

impl Hash for Candidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
    }
}

// Classes with fewer type parameters are simpler to construct.
fn by_complexity(a: &Candidate, b: &Candidate) -> Ordering {
    a.type_param_count.cmp(&b.type_param_count)
}

/// Chooses concrete classes for type variables and wildcards and learns new candidates on demand.
///
/// One manager belongs to one generation run. Parallel workers each create their own and can
/// merge what they learned with [`TypeInstantiationManager::absorb`].
#[derive(Debug)]
pub struct TypeInstantiationManager {
    pool: PrioritizedCandidatePool<Candidate>,
    rank_bias: f64,
    functional_mocking: bool,
    default_candidates: Vec<DefaultCandidate>,
    rng: StdRng,
}

impl TypeInstantiationManager {
    /// Create a manager seeded with the configured default candidates.
    pub fn new(config: &GenerationConfig, cluster: &TestCluster<'_>) -> Result<Self, CastError> {
        if !(config.rank_bias > 1.0 && config.rank_bias <= 2.0) {
            return Err(CastError::InvalidArgument {
                reason: "rank bias must lie in (1, 2]",
            });
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut manager = Self {
            pool: PrioritizedCandidatePool::new(by_complexity),
            rank_bias: config.rank_bias,
            functional_mocking: config.functional_mocking.is_active(),
            default_candidates: config.default_candidates.clone(),
            rng,
        };
        manager.register_defaults(cluster);
        Ok(manager)
    }

    pub fn rank_bias(&self) -> f64 {
        self.rank_bias
    }

    /// Drop everything learned so far and restore the default candidates.
    ///
    /// Must not be called while a resolution is in progress. The random source is not reseeded.
    pub fn clear(&mut self, cluster: &TestCluster<'_>) {
        self.pool.clear();
        self.register_defaults(cluster);
        tracing::debug!(target = "evo.cast", count = self.pool.len(), "candidate pool reset");
    }

    fn register_defaults(&mut self, cluster: &TestCluster<'_>) {
        let defaults = self.default_candidates.clone();
        for default in &defaults {
            self.add_candidate_by_name(cluster, &default.name, default.priority);
        }
    }

    /// Registered candidates and their priorities, in registration order.
    pub fn candidates(&self) -> Vec<(ClassType, i32)> {
        self.pool
            .iter()
            .map(|(candidate, priority)| (candidate.ty.clone(), priority))
            .collect()
    }

    pub fn contains(&self, ty: &ClassType) -> bool {
        self.pool.contains(&Candidate {
            ty: ty.clone(),
            type_param_count: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Register a type known to be useful, e.g. the target of a cast.
    ///
    /// Abstract classes and interfaces are replaced by their usable concrete implementations,
    /// instantiated to match `ty`'s type arguments. With functional mocking active the abstract
    /// type is registered as well. Unusable classes are skipped silently.
    ///
    /// Fails with [`CastError::InvalidCandidate`] when `ty` does not erase to a known class.
    pub fn add_candidate(
        &mut self,
        cluster: &TestCluster<'_>,
        ty: &Type,
        priority: i32,
    ) -> Result<(), CastError> {
        let env = cluster.env;
        let Some(class_ty) = class_candidate(env, ty) else {
            let candidate = format_type(env, ty);
            tracing::warn!(target = "evo.cast", %candidate, "rejected candidate without class erasure");
            return Err(CastError::InvalidCandidate { candidate });
        };
        let is_abstract = env
            .class(class_ty.def)
            .is_some_and(|def| def.is_abstract_or_interface());

        if !is_abstract {
            if cluster.can_use(class_ty.def) {
                self.insert(env, class_ty, priority);
            } else {
                tracing::trace!(
                    target = "evo.cast",
                    candidate = %format_type(env, &class_ty.to_type()),
                    "skipping unusable candidate"
                );
            }
            return Ok(());
        }

        for sub in cluster.resolver.concrete_classes(env, class_ty.def) {
            if !cluster.can_use(sub) {
                continue;
            }
            if let Some(concrete) = parameterize_as(env, sub, &class_ty) {
                self.insert(env, concrete, priority);
            }
        }
        if self.functional_mocking && cluster.can_use(class_ty.def) {
            self.insert(env, class_ty, priority);
        }
        Ok(())
    }

    /// Register a class by binary name. Unknown names are ignored.
    pub fn add_candidate_by_name(&mut self, cluster: &TestCluster<'_>, name: &str, priority: i32) {
        let Some(id) = cluster.env.lookup_class(name) else {
            tracing::debug!(target = "evo.cast", name, "candidate class not found");
            return;
        };
        if let Err(err) = self.add_candidate(cluster, &Type::class(id, vec![]), priority) {
            tracing::warn!(target = "evo.cast", name, error = %err, "failed to register candidate");
        }
    }

    /// Copy another manager's candidates into this one. Shared candidates take `other`'s priority.
    pub fn absorb(&mut self, other: &TypeInstantiationManager) {
        for (candidate, priority) in other.pool.iter() {
            self.pool.add(candidate.clone(), priority);
        }
        tracing::debug!(
            target = "evo.cast",
            absorbed = other.pool.len(),
            count = self.pool.len(),
            "merged candidate pools"
        );
    }

    pub fn resolve_type_variable(
        &mut self,
        cluster: &TestCluster<'_>,
        var: TypeVarId,
        allow_recursion: bool,
        bindings: &OwnerBindings,
    ) -> Result<ClassType, CastError> {
        self.resolve(cluster, &OpenType::TypeVar(var), allow_recursion, bindings)
    }

    pub fn resolve_wildcard(
        &mut self,
        cluster: &TestCluster<'_>,
        wildcard: &WildcardType,
        allow_recursion: bool,
        bindings: &OwnerBindings,
    ) -> Result<ClassType, CastError> {
        self.resolve(
            cluster,
            &OpenType::Wildcard(wildcard.clone()),
            allow_recursion,
            bindings,
        )
    }

    /// Pick any non-recursive candidate, as for an unconstrained `?`.
    pub fn select_any(&mut self, cluster: &TestCluster<'_>) -> Result<ClassType, CastError> {
        self.resolve_wildcard(cluster, &WildcardType::unbounded(), false, &OwnerBindings::new())
    }

    /// Choose a class for `open`.
    ///
    /// Known candidates satisfying the bounds are tried first; candidates that still contain
    /// type variables or wildcards are only used when `allow_recursion` is set or nothing else
    /// fits. When the pool has nothing, one new candidate is discovered, registered and the
    /// query repeated. The pool is only modified on that discovery path.
    pub fn resolve(
        &mut self,
        cluster: &TestCluster<'_>,
        open: &OpenType,
        allow_recursion: bool,
        bindings: &OwnerBindings,
    ) -> Result<ClassType, CastError> {
        let env = cluster.env;
        let bindings = bindings.sanitized();

        let mut candidates = self.query_with_fallback(env, open, allow_recursion, &bindings);
        if candidates.is_empty() {
            tracing::debug!(
                target = "evo.cast",
                open_type = %format_type(env, &open.to_type()),
                "no known candidate, starting discovery"
            );
            if self.discover(cluster, open, &bindings)? {
                candidates = self.query_with_fallback(env, open, allow_recursion, &bindings);
            }
        }

        if candidates.is_empty() {
            let err = CastError::NoAssignableType {
                open_type: format_type(env, &open.to_type()),
                bounds: open.describe_bounds(env),
            };
            tracing::debug!(target = "evo.cast", error = %err, "resolution failed");
            return Err(err);
        }

        let chosen = select_rank_biased(&candidates, self.rank_bias, &mut self.rng)?
            .ty
            .clone();
        tracing::trace!(
            target = "evo.cast",
            open_type = %format_type(env, &open.to_type()),
            candidate = %format_type(env, &chosen.to_type()),
            count = candidates.len(),
            "resolved open type"
        );
        Ok(chosen)
    }

    fn query(
        &self,
        env: &dyn TypeEnv,
        open: &OpenType,
        allow_recursion: bool,
        bindings: &OwnerBindings,
    ) -> Vec<Candidate> {
        self.pool.to_sorted_list(|candidate| {
            (allow_recursion || !candidate.is_recursive())
                && satisfies_bounds(env, &candidate.ty, open, bindings)
        })
    }

    fn query_with_fallback(
        &self,
        env: &dyn TypeEnv,
        open: &OpenType,
        allow_recursion: bool,
        bindings: &OwnerBindings,
    ) -> Vec<Candidate> {
        let candidates = self.query(env, open, allow_recursion, bindings);
        if !candidates.is_empty() || allow_recursion {
            return candidates;
        }
        let recursive = self.query(env, open, true, bindings);
        if !recursive.is_empty() {
            tracing::debug!(
                target = "evo.cast",
                open_type = %format_type(env, &open.to_type()),
                count = recursive.len(),
                "falling back to recursive candidates"
            );
        }
        recursive
    }

    /// Find and register new candidates for `open`. Returns whether the pool changed.
    ///
    /// Fails with [`CastError::InvalidCandidate`] when a source offers a class the environment
    /// does not define; nothing is registered in that case.
    fn discover(
        &mut self,
        cluster: &TestCluster<'_>,
        open: &OpenType,
        bindings: &OwnerBindings,
    ) -> Result<bool, CastError> {
        let mut found = candidates_from_sources(cluster, open, bindings)?;
        let changed = match open {
            OpenType::TypeVar(var) => {
                if found.is_empty() {
                    found = declared_bound_candidates(cluster, *var, bindings);
                }
                self.register_one_of(cluster.env, found)
            }
            OpenType::Wildcard(wildcard) => {
                let mut registered = false;
                for candidate in upper_bound_candidates(cluster, open, wildcard, bindings) {
                    if candidate.args.iter().any(is_open) {
                        found.push(candidate);
                    } else {
                        self.insert(cluster.env, candidate, DISCOVERED_PRIORITY);
                        registered = true;
                    }
                }
                self.register_one_of(cluster.env, found) || registered
            }
        };
        Ok(changed)
    }

    /// Register one of `found`, picked uniformly after sorting by name.
    fn register_one_of(&mut self, env: &dyn TypeEnv, mut found: Vec<ClassType>) -> bool {
        found.sort_by_cached_key(|candidate| format_type(env, &candidate.to_type()));
        found.dedup();
        if found.is_empty() {
            return false;
        }
        let index = self.rng.gen_range(0..found.len());
        let chosen = found.swap_remove(index);
        tracing::debug!(
            target = "evo.cast",
            candidate = %format_type(env, &chosen.to_type()),
            alternatives = found.len(),
            "discovered candidate"
        );
        self.insert(env, chosen, DISCOVERED_PRIORITY);
        true
    }

    fn insert(&mut self, env: &dyn TypeEnv, ty: ClassType, priority: i32) {
        tracing::trace!(
            target = "evo.cast",
            candidate = %format_type(env, &ty.to_type()),
            priority,
            "registering candidate"
        );
        self.pool.add(Candidate::new(env, ty), priority);
    }
}

/// Usable classes from the analyzed universe and from the owner bindings that satisfy `open`.
fn candidates_from_sources(
    cluster: &TestCluster<'_>,
    open: &OpenType,
    bindings: &OwnerBindings,
) -> Result<Vec<ClassType>, CastError> {
    let env = cluster.env;
    let from_bindings = bindings.values().filter_map(|value| binding_candidate(env, value));
    let mut out = Vec::new();
    for candidate in cluster.universe.analyzed_classes().into_iter().chain(from_bindings) {
        if env.class(candidate.def).is_none() {
            let candidate = format_type(env, &candidate.to_type());
            tracing::warn!(
                target = "evo.cast",
                %candidate,
                "discovery source offered an undefined class"
            );
            return Err(CastError::InvalidCandidate { candidate });
        }
        if cluster.can_use(candidate.def) && satisfies_bounds(env, &candidate, open, bindings) {
            out.push(candidate);
        }
    }
    Ok(out)
}

fn class_candidate(env: &dyn TypeEnv, ty: &Type) -> Option<ClassType> {
    match ty {
        Type::Class(class_ty) => env.class(class_ty.def).map(|_| class_ty.clone()),
        Type::TypeVar(_) | Type::Wildcard(_) => erased_class(env, ty).map(ClassType::raw),
        Type::Array(_) | Type::Primitive(_) | Type::Null => None,
    }
}

// Variables bound to other variables contribute their erasure.
fn binding_candidate(env: &dyn TypeEnv, value: &Type) -> Option<ClassType> {
    match value {
        Type::Class(class_ty) => Some(class_ty.clone()),
        Type::TypeVar(_) => erased_class(env, value).map(ClassType::raw),
        _ => None,
    }
}

/// Concrete implementations of a type variable's declared bounds.
///
/// A bound naming the variable as one of its own type arguments (`T extends Comparable<T>`)
/// cannot be instantiated from its implementations and is skipped, except for `Enum<E>` whose
/// implementations are exactly the enum classes.
fn declared_bound_candidates(
    cluster: &TestCluster<'_>,
    var: TypeVarId,
    bindings: &OwnerBindings,
) -> Vec<ClassType> {
    let env = cluster.env;
    let Some(tp) = env.type_param(var) else {
        return Vec::new();
    };
    let wk = env.well_known();
    let bounds = if tp.upper_bounds.is_empty() {
        vec![Type::class(wk.object, vec![])]
    } else {
        tp.upper_bounds.clone()
    };

    let mut out = Vec::new();
    for upper in &bounds {
        let bound = bindings.apply(upper);
        let Some(bound_class) = erased_class(env, &bound) else {
            continue;
        };
        let is_enum_bound = bound_class == wk.enum_;
        if !is_enum_bound && mentions_type_var_directly(&bound, var) {
            tracing::trace!(
                target = "evo.cast",
                bound = %format_type(env, &bound),
                "skipping self-referential bound"
            );
            continue;
        }
        let target = match &bound {
            Type::Class(class_ty) => class_ty.clone(),
            _ => ClassType::raw(bound_class),
        };

        for sub in cluster.resolver.concrete_classes(env, bound_class) {
            if !cluster.can_use(sub) {
                continue;
            }
            if is_enum_bound {
                if env.class(sub).is_some_and(|def| def.kind == ClassKind::Enum) {
                    out.push(ClassType::raw(sub));
                }
                continue;
            }
            if let Some(candidate) = parameterize_as(env, sub, &target) {
                out.push(candidate);
            }
        }
    }

    let open = OpenType::TypeVar(var);
    out.retain(|candidate| satisfies_bounds(env, candidate, &open, bindings));
    out
}

/// Concrete implementations of a wildcard's upper bounds that satisfy the whole wildcard.
fn upper_bound_candidates(
    cluster: &TestCluster<'_>,
    open: &OpenType,
    wildcard: &WildcardType,
    bindings: &OwnerBindings,
) -> Vec<ClassType> {
    let env = cluster.env;
    let object = env.well_known().object;
    let mut out = Vec::new();
    for upper in &wildcard.upper_bounds {
        let bound = bindings.apply(upper);
        let Some(bound_class) = erased_class(env, &bound) else {
            continue;
        };
        // `? extends Object` says nothing; the universe already covers it.
        if bound_class == object {
            continue;
        }
        let target = match &bound {
            Type::Class(class_ty) => class_ty.clone(),
            _ => ClassType::raw(bound_class),
        };
        for sub in cluster.resolver.concrete_classes(env, bound_class) {
            if !cluster.can_use(sub) {
                continue;
            }
            let Some(candidate) = parameterize_as(env, sub, &target) else {
                continue;
            };
            if satisfies_bounds(env, &candidate, open, bindings) && !out.contains(&candidate) {
                out.push(candidate);
            }
        }
    }
    out
}

//! Collaborators the candidate manager consults but does not own.
//!
//! The surrounding test generator decides which classes exist, which ones may appear in generated
//! code and how abstract types map onto implementations. The traits here are the seams; the
//! structs are straightforward implementations over a [`TypeStore`] used by tests and by callers
//! that have nothing better.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use evo_types::{direct_supertypes, ClassId, ClassType, TypeEnv, TypeStore};

/// Maps an abstract class or interface onto the concrete classes known to implement it.
pub trait ConcreteClassResolver {
    /// Instantiable classes assignable to `class`, including `class` itself when it is concrete.
    fn concrete_classes(&self, env: &dyn TypeEnv, class: ClassId) -> Vec<ClassId>;
}

/// Decides whether a class may legally appear in generated test code.
pub trait UsabilityChecker {
    fn can_use(&self, env: &dyn TypeEnv, class: ClassId) -> bool;
}

/// The classes the surrounding system has chosen to consider for the current target.
pub trait AnalyzedClasses {
    fn analyzed_classes(&self) -> Vec<ClassType>;
}

/// Everything a resolution call needs besides the manager's own state.
#[derive(Clone, Copy)]
pub struct TestCluster<'a> {
    pub env: &'a dyn TypeEnv,
    pub resolver: &'a dyn ConcreteClassResolver,
    pub usability: &'a dyn UsabilityChecker,
    pub universe: &'a dyn AnalyzedClasses,
}

impl<'a> TestCluster<'a> {
    pub fn new(
        env: &'a dyn TypeEnv,
        resolver: &'a dyn ConcreteClassResolver,
        usability: &'a dyn UsabilityChecker,
        universe: &'a dyn AnalyzedClasses,
    ) -> Self {
        Self {
            env,
            resolver,
            usability,
            universe,
        }
    }

    pub(crate) fn can_use(&self, class: ClassId) -> bool {
        self.usability.can_use(self.env, class)
    }
}

impl std::fmt::Debug for TestCluster<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCluster").finish_non_exhaustive()
    }
}

/// Subtype edges of every class in a store, computed once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InheritanceTree {
    subtypes: BTreeMap<ClassId, Vec<ClassId>>,
}

impl InheritanceTree {
    pub fn build(store: &TypeStore) -> Self {
        let mut subtypes: BTreeMap<ClassId, Vec<ClassId>> = BTreeMap::new();
        for class in store.class_ids() {
            for sup in direct_supertypes(store, &ClassType::raw(class)) {
                let children = subtypes.entry(sup.def).or_default();
                if !children.contains(&class) {
                    children.push(class);
                }
            }
        }
        Self { subtypes }
    }

    /// All known (transitive) subtypes of `base`, breadth first.
    pub fn all_subtypes(&self, base: ClassId) -> Vec<ClassId> {
        let mut out = Vec::new();
        let mut seen: BTreeSet<ClassId> = BTreeSet::new();
        let mut queue: VecDeque<ClassId> = self
            .subtypes
            .get(&base)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .collect();

        while let Some(next) = queue.pop_front() {
            if !seen.insert(next) {
                continue;
            }
            out.push(next);
            if let Some(children) = self.subtypes.get(&next) {
                queue.extend(children.iter().copied());
            }
        }
        out
    }
}

impl ConcreteClassResolver for InheritanceTree {
    fn concrete_classes(&self, env: &dyn TypeEnv, class: ClassId) -> Vec<ClassId> {
        let mut out: Vec<(String, ClassId)> = std::iter::once(class)
            .chain(self.all_subtypes(class))
            .filter_map(|id| {
                let def = env.class(id)?;
                def.is_instantiable().then(|| (def.name.clone(), id))
            })
            .collect();
        out.sort();
        out.dedup_by_key(|(_, id)| *id);
        out.into_iter().map(|(_, id)| id).collect()
    }
}

/// Visibility-based legality rules with an explicit deny list.
#[derive(Clone, Debug, Default)]
pub struct UsabilityRules {
    denied: HashSet<String>,
    allow_non_public: bool,
}

impl UsabilityRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject `name` regardless of visibility.
    pub fn deny(mut self, name: impl Into<String>) -> Self {
        self.denied.insert(name.into());
        self
    }

    /// Allow package-private classes, e.g. when tests are emitted into the target's package.
    pub fn allow_non_public(mut self, allow: bool) -> Self {
        self.allow_non_public = allow;
        self
    }
}

impl UsabilityChecker for UsabilityRules {
    fn can_use(&self, env: &dyn TypeEnv, class: ClassId) -> bool {
        let Some(def) = env.class(class) else {
            return false;
        };
        if !def.is_public && !self.allow_non_public {
            return false;
        }
        if is_anonymous(&def.name) {
            return false;
        }
        !self.denied.contains(&def.name)
    }
}

// `Outer$1` cannot be named in source.
fn is_anonymous(name: &str) -> bool {
    name.rsplit('$')
        .next()
        .filter(|_| name.contains('$'))
        .is_some_and(|last| last.starts_with(|c: char| c.is_ascii_digit()))
}

/// An explicit analyzed-class universe. Insertion order is kept; duplicates are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalyzedClassSet {
    classes: Vec<ClassType>,
}

impl AnalyzedClassSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: ClassType) {
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<ClassType> for AnalyzedClassSet {
    fn from_iter<I: IntoIterator<Item = ClassType>>(iter: I) -> Self {
        let mut set = Self::new();
        for class in iter {
            set.insert(class);
        }
        set
    }
}

impl AnalyzedClasses for AnalyzedClassSet {
    fn analyzed_classes(&self) -> Vec<ClassType> {
        self.classes.clone()
    }
}

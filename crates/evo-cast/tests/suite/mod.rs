use evo_cast::cluster::{AnalyzedClassSet, InheritanceTree, UsabilityRules};
use evo_cast::{TestCluster, TypeInstantiationManager};
use evo_config::{DefaultCandidate, GenerationConfig};
use evo_types::{format_type, ClassDef, ClassId, ClassKind, ClassType, Type, TypeStore};

mod pool_props;
mod registration;

/// A type store plus the collaborators a manager needs, owned in one place so tests can borrow a
/// [`TestCluster`] from it.
pub struct Fixture {
    pub store: TypeStore,
    pub tree: InheritanceTree,
    pub rules: UsabilityRules,
    pub universe: AnalyzedClassSet,
}

impl Fixture {
    pub fn new(store: TypeStore) -> Self {
        let tree = InheritanceTree::build(&store);
        Self {
            store,
            tree,
            rules: UsabilityRules::new(),
            universe: AnalyzedClassSet::new(),
        }
    }

    pub fn jdk() -> Self {
        Self::new(TypeStore::with_minimal_jdk())
    }

    pub fn with_rules(mut self, rules: UsabilityRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_universe(mut self, classes: impl IntoIterator<Item = ClassType>) -> Self {
        self.universe = classes.into_iter().collect();
        self
    }

    pub fn cluster(&self) -> TestCluster<'_> {
        TestCluster::new(&self.store, &self.tree, &self.rules, &self.universe)
    }

    pub fn manager(&self, config: &GenerationConfig) -> TypeInstantiationManager {
        TypeInstantiationManager::new(config, &self.cluster()).expect("valid config")
    }

    pub fn class(&self, name: &str) -> ClassId {
        self.store
            .class_id(name)
            .unwrap_or_else(|| panic!("{name} not in store"))
    }

    pub fn ty(&self, name: &str, args: Vec<Type>) -> Type {
        Type::class(self.class(name), args)
    }

    pub fn render(&self, ty: &ClassType) -> String {
        format_type(&self.store, &ty.to_type())
    }
}

pub fn seeded(seed: u64) -> GenerationConfig {
    GenerationConfig {
        seed: Some(seed),
        ..GenerationConfig::default()
    }
}

pub fn seeded_with_defaults(seed: u64, defaults: &[(&str, i32)]) -> GenerationConfig {
    GenerationConfig {
        default_candidates: defaults
            .iter()
            .map(|(name, priority)| DefaultCandidate {
                name: (*name).to_owned(),
                priority: *priority,
            })
            .collect(),
        ..seeded(seed)
    }
}

pub fn public_class(
    store: &mut TypeStore,
    name: &str,
    kind: ClassKind,
    is_abstract: bool,
    super_class: Option<Type>,
) -> ClassId {
    store.add_class(ClassDef {
        name: name.to_owned(),
        kind,
        is_abstract,
        is_public: true,
        type_params: Vec::new(),
        super_class,
        interfaces: Vec::new(),
    })
}

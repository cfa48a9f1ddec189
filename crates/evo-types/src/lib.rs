//! Explicit model of Java's generic type system.
//!
//! The test generator never sees `java.lang.reflect`; every question it needs answered about
//! generics (erasure, bound satisfaction, assignability) is answered against the definitions held
//! in a [`TypeStore`] through the read-only [`TypeEnv`] trait.
//!
//! Ids are dense indices into the store. They are only meaningful for the store that allocated
//! them.

#![forbid(unsafe_code)]

mod format;
mod jdk;
mod subst;
mod subtyping;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use format::format_type;
pub use subst::{
    contains_type_var, erased_class, erasure, is_open, mentions_type_var_directly,
    replace_type_vars_with_wildcards, substitute, substitute_with,
};
pub use subtyping::{
    direct_supertypes, instantiate_as_supertype, is_subtype, is_unbounded_wildcard,
    MAX_BOUND_DEPTH,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(u32);

impl ClassId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn to_raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId(u32);

impl TypeVarId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn to_raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

/// A class or interface type, possibly parameterized.
///
/// Empty `args` on a generic class is the raw type (`List` rather than `List<String>`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub def: ClassId,
    pub args: Vec<Type>,
}

impl ClassType {
    pub fn new(def: ClassId, args: Vec<Type>) -> Self {
        Self { def, args }
    }

    pub fn raw(def: ClassId) -> Self {
        Self {
            def,
            args: Vec::new(),
        }
    }

    pub fn to_type(&self) -> Type {
        Type::Class(self.clone())
    }
}

/// `?`, `? extends U` or `? super L`.
///
/// Empty `upper_bounds` means the implicit `Object` bound.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WildcardType {
    pub upper_bounds: Vec<Type>,
    pub lower_bounds: Vec<Type>,
}

impl WildcardType {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn extends(upper: Type) -> Self {
        Self {
            upper_bounds: vec![upper],
            lower_bounds: Vec::new(),
        }
    }

    pub fn super_of(lower: Type) -> Self {
        Self {
            upper_bounds: Vec::new(),
            lower_bounds: vec![lower],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Class(ClassType),
    TypeVar(TypeVarId),
    Wildcard(WildcardType),
    Array(Box<Type>),
    Primitive(PrimitiveType),
    Null,
}

impl Type {
    pub fn class(def: ClassId, args: Vec<Type>) -> Self {
        Type::Class(ClassType { def, args })
    }

    pub fn array(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    pub fn wildcard() -> Self {
        Type::Wildcard(WildcardType::unbounded())
    }

    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            Type::Class(ct) => Some(ct),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, Type::Primitive(_))
    }

    /// `true` for type variables and wildcards, i.e. shapes that still need instantiating.
    pub fn is_open_shape(&self) -> bool {
        matches!(self, Type::TypeVar(_) | Type::Wildcard(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.ArrayList`.
    pub name: String,
    pub kind: ClassKind,
    pub is_abstract: bool,
    pub is_public: bool,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
}

impl ClassDef {
    /// Whether `new C(...)` could appear in generated code.
    pub fn is_instantiable(&self) -> bool {
        self.kind != ClassKind::Interface && !self.is_abstract
    }

    pub fn is_abstract_or_interface(&self) -> bool {
        !self.is_instantiable()
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// The generic declaration that introduced a type parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeParamOwner {
    Class(ClassId),
    Method { class: ClassId, name: String },
    Free,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    pub owner: TypeParamOwner,
    /// Declared bounds. May reference other type variables, including this one
    /// (`T extends Comparable<T>`).
    pub upper_bounds: Vec<Type>,
    pub lower_bound: Option<Type>,
}

/// Ids of the classes the instantiation logic treats specially.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
    pub integer: ClassId,
    pub number: ClassId,
    pub enum_: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
}

/// Read-only view of class and type parameter definitions.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    /// Lookup by binary name; unqualified names fall back to `java.lang.*`.
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;
}

#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    class_by_name: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    well_known: WellKnownTypes,
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::with_minimal_jdk()
    }
}

impl TypeStore {
    /// Add (or replace) a class definition, keyed by its binary name.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    /// Reserve an id for `name` without defining it yet.
    ///
    /// Needed for self-referential declarations such as `Enum<E extends Enum<E>>`, where the
    /// bound of `E` names the class being declared. The placeholder is a public, non-generic
    /// class until [`TypeStore::define_class`] replaces it.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_by_name.get(name) {
            return *id;
        }
        let raw: u32 = self
            .classes
            .len()
            .try_into()
            .expect("too many classes in type store");
        let id = ClassId(raw);
        self.classes.push(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Class,
            is_abstract: false,
            is_public: true,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
        });
        self.class_by_name.insert(name.to_string(), id);
        id
    }

    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        let Some(slot) = self.classes.get_mut(id.index()) else {
            return;
        };
        if slot.name != def.name {
            self.class_by_name.remove(&slot.name);
            self.class_by_name.insert(def.name.clone(), id);
        }
        *slot = def;
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.index())
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    /// All class ids in allocation order.
    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len()).map(|idx| ClassId(idx as u32))
    }

    /// Add a type parameter that is not attached to any declaration.
    pub fn add_type_param(&mut self, name: impl Into<String>, upper_bounds: Vec<Type>) -> TypeVarId {
        self.add_owned_type_param(name, TypeParamOwner::Free, upper_bounds)
    }

    pub fn add_owned_type_param(
        &mut self,
        name: impl Into<String>,
        owner: TypeParamOwner,
        upper_bounds: Vec<Type>,
    ) -> TypeVarId {
        let raw: u32 = self
            .type_params
            .len()
            .try_into()
            .expect("too many type params in type store");
        self.type_params.push(TypeParamDef {
            name: name.into(),
            owner,
            upper_bounds,
            lower_bound: None,
        });
        TypeVarId(raw)
    }

    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeParamDef) {
        if let Some(slot) = self.type_params.get_mut(id.index()) {
            *slot = def;
        }
    }

    pub fn type_param_mut(&mut self, id: TypeVarId) -> Option<&mut TypeParamDef> {
        self.type_params.get_mut(id.index())
    }

    fn empty(well_known: WellKnownTypes) -> Self {
        Self {
            classes: Vec::new(),
            class_by_name: HashMap::new(),
            type_params: Vec::new(),
            well_known,
        }
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index())
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.class_id(name) {
            return Some(id);
        }
        if name.contains('.') {
            return None;
        }
        self.class_id(&format!("java.lang.{name}"))
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

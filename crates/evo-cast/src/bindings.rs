use std::collections::BTreeMap;

use evo_types::{substitute_with, Type, TypeVarId};

/// What the enclosing generic context has already bound its type variables to.
///
/// Resolving a member of `Outer<E>` needs `E`'s binding from `Outer`. Iteration order is by
/// variable id so discovery over binding values is reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnerBindings {
    map: BTreeMap<TypeVarId, Type>,
}

impl OwnerBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, var: TypeVarId, ty: Type) -> Option<Type> {
        self.map.insert(var, ty)
    }

    pub fn get(&self, var: TypeVarId) -> Option<&Type> {
        self.map.get(&var)
    }

    pub fn values(&self) -> impl Iterator<Item = &Type> + '_ {
        self.map.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVarId, &Type)> + '_ {
        self.map.iter().map(|(var, ty)| (*var, ty))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// A copy without `E -> E` entries.
    ///
    /// Such entries carry no information, and keeping them makes every bound that mentions `E`
    /// fail to resolve.
    pub fn sanitized(&self) -> Self {
        self.map
            .iter()
            .filter(|(var, ty)| !matches!(ty, Type::TypeVar(bound) if bound == *var))
            .map(|(var, ty)| (*var, ty.clone()))
            .collect()
    }

    /// Substitute bound variables in `ty`. Unbound variables are left in place.
    pub fn apply(&self, ty: &Type) -> Type {
        if self.map.is_empty() {
            return ty.clone();
        }
        substitute_with(ty, &mut |var| self.map.get(&var).cloned())
    }
}

impl FromIterator<(TypeVarId, Type)> for OwnerBindings {
    fn from_iter<I: IntoIterator<Item = (TypeVarId, Type)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

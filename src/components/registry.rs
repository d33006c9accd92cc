//! Name-keyed component registries.
//!
//! A `Registry` is an arena of components plus a name → index map. The
//! compiler fills it once; the interpreter then looks components up by
//! typed id. Registration order is declaration order and ids are dense.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::core::{CompileError, CompileResult};

/// Dense typed index into a `Registry`.
pub trait ComponentId: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

/// Components that are looked up by name.
pub trait Named {
    fn name(&self) -> &str;
}

macro_rules! component_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl ComponentId for $name {
            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

component_id!(
    /// Index of a compiled `Action`.
    ActionId,
    "Action"
);
component_id!(
    /// Index of a compiled `Condition`.
    ConditionId,
    "Condition"
);
component_id!(
    /// Index of a compiled `ControlledAction`.
    ControlledId,
    "Controlled"
);
component_id!(
    /// Index of a compiled `Phase`.
    PhaseId,
    "Phase"
);

/// Arena of components with a name index.
#[derive(Clone, Debug)]
pub struct Registry<I, T> {
    kind: &'static str,
    items: Vec<T>,
    by_name: FxHashMap<String, usize>,
    _id: PhantomData<I>,
}

impl<I: ComponentId, T: Named> Registry<I, T> {
    /// Create an empty registry for components of `kind` (used in errors).
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            items: Vec::new(),
            by_name: FxHashMap::default(),
            _id: PhantomData,
        }
    }

    /// Add a component. Fails `DuplicateComponent` if the name is taken.
    pub fn register(&mut self, item: T) -> CompileResult<I> {
        if self.by_name.contains_key(item.name()) {
            return Err(CompileError::DuplicateComponent {
                kind: self.kind,
                name: item.name().to_string(),
            });
        }
        let index = self.items.len();
        self.by_name.insert(item.name().to_string(), index);
        self.items.push(item);
        Ok(I::from_index(index))
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    #[must_use]
    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.index())
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<I> {
        self.by_name.get(name).map(|&index| I::from_index(index))
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&T> {
        self.lookup(name).and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_index(i), item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing(&'static str);

    impl Named for Thing {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry: Registry<ActionId, Thing> = Registry::new("action");
        let a = registry.register(Thing("draw")).unwrap();
        let b = registry.register(Thing("play")).unwrap();
        assert_eq!(a, ActionId::new(0));
        assert_eq!(b, ActionId::new(1));
        assert_eq!(registry.lookup("play"), Some(b));
        assert_eq!(registry.get(a).unwrap().name(), "draw");
        assert!(registry.lookup("pass").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_names_fail() {
        let mut registry: Registry<PhaseId, Thing> = Registry::new("phase");
        registry.register(Thing("main")).unwrap();
        let err = registry.register(Thing("main")).unwrap_err();
        assert!(matches!(
            err,
            CompileError::DuplicateComponent { kind: "phase", .. }
        ));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(PhaseId::new(3).to_string(), "Phase(3)");
    }
}

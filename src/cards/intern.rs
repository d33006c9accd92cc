//! Per-compilation interning of card attribute names.
//!
//! Every card with face `queen` shares one `Arc<str>` allocation, so
//! attribute comparison is usually a pointer check. The cache belongs to
//! a single compilation: independently compiled games never share
//! mutable state.

use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Interning cache for face and group names.
///
/// ```
/// use card_referee::cards::Interner;
/// use std::sync::Arc;
///
/// let mut interner = Interner::new();
/// let a = interner.intern("queen");
/// let b = interner.intern("queen");
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Interner {
    symbols: FxHashSet<Arc<str>>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical shared copy of `name`.
    pub fn intern(&mut self, name: &str) -> Arc<str> {
        if let Some(existing) = self.symbols.get(name) {
            return Arc::clone(existing);
        }
        let symbol: Arc<str> = Arc::from(name);
        self.symbols.insert(Arc::clone(&symbol));
        symbol
    }

    /// Already-interned copy of `name`, if any.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<str>> {
        self.symbols.get(name).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

//! Interned names and symbols.
//!
//! Every identifier the parser produces and every `Symbol` value the runtime
//! creates goes through one interner, so "two symbols with the same name are
//! the same object" holds by construction: equal names intern to the same
//! `Sym`, and `Sym` equality is a `u32` compare.

// Arc is required: the interner is shared between the parser collaborator
// and the evaluator, and symbol values keep it alive for the program's life.
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Interned string identifier.
///
/// Ids are assigned monotonically at first interning and never reused, so a
/// `Sym`'s raw value doubles as the runtime symbol id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Sym(u32);

impl Sym {
    /// Pre-interned empty string.
    pub const EMPTY: Sym = Sym(0);

    /// Get the raw u32 id.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Create from a raw u32 id.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Sym(raw)
    }
}

impl fmt::Debug for Sym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sym({})", self.0)
    }
}

impl Default for Sym {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// The table exceeded `u32` capacity.
    Overflow { count: usize },
}

impl fmt::Display for InternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternError::Overflow { count } => {
                write!(f, "interner exceeded capacity: {count} strings")
            }
        }
    }
}

impl std::error::Error for InternError {}

struct InternTable {
    /// Map from string content to id.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by id.
    strings: Vec<&'static str>,
}

impl InternTable {
    fn with_empty() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        InternTable {
            map,
            strings: vec![empty],
        }
    }
}

/// Append-only string interner.
///
/// Provides O(1) lookup and equality for interned strings. Interned strings
/// are leaked to obtain `'static` lifetime and are never deallocated — the
/// table only grows, which is what makes concurrent reads safe during
/// evaluation.
pub struct SymbolInterner {
    table: RwLock<InternTable>,
}

impl SymbolInterner {
    /// Create a new interner with the empty string pre-interned at id 0.
    pub fn new() -> Self {
        SymbolInterner {
            table: RwLock::new(InternTable::with_empty()),
        }
    }

    /// Try to intern a string, returning its `Sym` or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Sym, InternError> {
        // Fast path: already interned.
        {
            let guard = self.table.read();
            if let Some(&id) = guard.map.get(s) {
                return Ok(Sym(id));
            }
        }

        let mut guard = self.table.write();

        // Double-check after acquiring the write lock.
        if let Some(&id) = guard.map.get(s) {
            return Ok(Sym(id));
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let id = u32::try_from(guard.strings.len()).map_err(|_| InternError::Overflow {
            count: guard.strings.len(),
        })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, id);
        Ok(Sym(id))
    }

    /// Intern a string, returning its `Sym`.
    ///
    /// # Panics
    /// Panics if the table exceeds `u32` capacity. Use `try_intern` for
    /// fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Sym {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a `Sym`.
    pub fn lookup(&self, sym: Sym) -> &'static str {
        let guard = self.table.read();
        guard.strings[sym.raw() as usize]
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// True if only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for SymbolInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for looking up interned names.
///
/// Lets callers accept any lookup source without depending on
/// `SymbolInterner` directly.
pub trait StringLookup {
    /// Look up the string for an interned name.
    fn lookup(&self, sym: Sym) -> &str;
}

impl StringLookup for SymbolInterner {
    fn lookup(&self, sym: Sym) -> &str {
        SymbolInterner::lookup(self, sym)
    }
}

/// Shared handle to the interner.
///
/// The parser collaborator and the interpreter hold clones of the same
/// handle, so names interned while parsing resolve during evaluation.
#[derive(Clone)]
pub struct SharedInterner(Arc<SymbolInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        SharedInterner(Arc::new(SymbolInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = SymbolInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_and_lookup() {
        let interner = SymbolInterner::new();

        let hello = interner.intern("hello");
        let world = interner.intern("world");
        let hello2 = interner.intern("hello");

        assert_eq!(hello, hello2);
        assert_ne!(hello, world);

        assert_eq!(interner.lookup(hello), "hello");
        assert_eq!(interner.lookup(world), "world");
    }

    #[test]
    fn empty_string_is_sym_zero() {
        let interner = SymbolInterner::new();
        let empty = interner.intern("");
        assert_eq!(empty, Sym::EMPTY);
        assert_eq!(interner.lookup(Sym::EMPTY), "");
    }

    #[test]
    fn ids_are_monotonic() {
        let interner = SymbolInterner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let c = interner.intern("c");
        assert!(a.raw() < b.raw());
        assert!(b.raw() < c.raw());
        // Re-interning never mints a new id.
        assert_eq!(interner.intern("a"), a);
        assert_eq!(interner.len(), 4); // "", a, b, c
    }

    #[test]
    fn shared_interner_handles_agree() {
        let interner = SharedInterner::new();
        let other = interner.clone();

        let s1 = interner.intern("shared");
        let s2 = other.intern("shared");
        assert_eq!(s1, s2);
    }
}

use indexmap::IndexSet;
use smartstring::alias::String;
use std::fmt::Debug;
use std::marker::PhantomData;

/// Index type handed out by a [`Symtab`].
pub trait SymbolId: Copy + Debug + Eq {
    fn from_index(idx: usize) -> Self;
    fn index(self) -> usize;
}

/// Insertion-ordered interning table mapping symbol text to typed indices.
#[derive(Clone, Debug)]
pub struct Symtab<I> {
    set: IndexSet<String>,
    _id: PhantomData<I>,
}

impl<I> Default for Symtab<I> {
    fn default() -> Self {
        Self {
            set: IndexSet::new(),
            _id: PhantomData,
        }
    }
}

impl<I: SymbolId> Symtab<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `sym`, returning the existing index when already present.
    pub fn add(&mut self, sym: &str) -> I {
        if let Some(idx) = self.set.get_index_of(sym) {
            return I::from_index(idx);
        }
        let (idx, _) = self.set.insert_full(String::from(sym));
        I::from_index(idx)
    }

    pub fn idx(&self, sym: &str) -> Option<I> {
        self.set.get_index_of(sym).map(I::from_index)
    }

    pub fn contains(&self, sym: &str) -> bool {
        self.set.contains(sym)
    }

    /// Text of an interned symbol; `None` for indices this table never issued.
    pub fn sym(&self, id: I) -> Option<&str> {
        self.set.get_index(id.index()).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        (0..self.set.len()).map(I::from_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, &str)> + '_ {
        self.set
            .iter()
            .enumerate()
            .map(|(i, s)| (I::from_index(i), s.as_str()))
    }
}

use crate::collections::catalog::CatalogEntry;
use crate::models::course::Level;

/// Exact-match selector with an "all" wildcard
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::All
    }
}

impl<T> Selector<T> {
    pub fn accepts<Q>(&self, value: &Q) -> bool
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        match self {
            Selector::All => true,
            Selector::Only(expected) => expected == value,
        }
    }

    /// Entries without the attribute only pass the wildcard
    pub fn accepts_opt(&self, value: Option<&T>) -> bool
    where
        T: PartialEq,
    {
        match (self, value) {
            (Selector::All, _) => true,
            (Selector::Only(expected), Some(value)) => expected == value,
            (Selector::Only(_), None) => false,
        }
    }
}

impl Selector<String> {
    /// Parse a filter label; `Tous`, `all`, `*` and the empty label select everything
    pub fn from_label(label: &str) -> Self {
        match label {
            "" | "Tous" | "all" | "*" => Selector::All,
            other => Selector::Only(other.to_string()),
        }
    }
}

/// Which read path a query serves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Audience {
    /// Visitors: hidden entries never appear
    #[default]
    Public,
    /// Administrators see everything
    Admin,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: String,
    pub category: Selector<String>,
    pub level: Selector<Level>,
    pub audience: Audience,
}

impl CatalogQuery {
    pub fn public() -> Self {
        Self::default()
    }

    pub fn admin() -> Self {
        Self {
            audience: Audience::Admin,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn with_category(mut self, category: Selector<String>) -> Self {
        self.category = category;
        self
    }

    pub fn with_level(mut self, level: Selector<Level>) -> Self {
        self.level = level;
        self
    }

    pub fn matches<E: CatalogEntry>(&self, entry: &E) -> bool {
        if self.audience == Audience::Public && !entry.is_visible() {
            return false;
        }

        self.category.accepts(entry.category())
            && self.level.accepts_opt(entry.level().as_ref())
            && matches_search(&self.search, entry.title(), entry.description())
    }
}

/// Case-insensitive substring match against title or description
pub fn matches_search(term: &str, title: &str, description: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    title.to_lowercase().contains(&term) || description.to_lowercase().contains(&term)
}

pub fn id_equals<E: CatalogEntry>(id: i64) -> impl Fn(&E) -> bool {
    move |entry: &E| entry.id() == id
}

pub fn in_category<E: CatalogEntry>(name: impl Into<String>) -> impl Fn(&E) -> bool {
    let name = name.into();
    move |entry: &E| entry.category() == name
}

/// Lazy, restartable view over a collection snapshot
pub struct View<'a, E, P> {
    items: &'a [E],
    predicate: P,
}

impl<'a, E, P> View<'a, E, P>
where
    P: Fn(&E) -> bool,
{
    pub(crate) fn new(items: &'a [E], predicate: P) -> Self {
        Self { items, predicate }
    }

    /// Fresh iterator on every call
    pub fn iter(&self) -> impl Iterator<Item = &'a E> + '_ {
        let predicate = &self.predicate;
        self.items.iter().filter(move |entry| predicate(*entry))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn first(&self) -> Option<&'a E> {
        self.iter().next()
    }

    pub fn to_vec(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.iter().cloned().collect()
    }
}

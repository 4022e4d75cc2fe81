//! Selection state of the stake pool page.
//!
//! [`SelectionSet`] is a small insertion-ordered collection keyed by a string
//! identity; [`StakePoolController`] owns two of them plus the page's
//! display toggles and the total-staked figure.

pub mod controller;

pub use controller::StakePoolController;

/// User-input problems reported back to the page. The `Display` text is what
/// the user sees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum ValidationError {
    #[strum(serialize = "Please enter a valid amount")]
    InvalidAmount,
    #[strum(serialize = "No tokens selected")]
    NoTokensSelected,
}

impl std::error::Error for ValidationError {}

/// Outcome of one selection call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    Selected,
    Deselected,
    /// The call ran but the set was already in the requested state.
    Unchanged,
    /// The call was dropped (action in flight, or not the owner).
    Ignored,
}

/// Parse a partial stake amount the way the page accepts it.
///
/// Surrounding whitespace is ignored. Zero, infinities and anything that is
/// not a number are rejected.
pub fn parse_stake_amount(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount != 0.0 => Ok(amount),
        _ => Err(ValidationError::InvalidAmount),
    }
}

/// Insertion-ordered records, unique by a caller-supplied key.
///
/// Lookups are linear scans; the page only ever holds a few dozen entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionSet<T> {
    items: Vec<T>,
}

impl<T> Default for SelectionSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Clone> SelectionSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }

    pub fn contains_by<F>(&self, key: &str, key_of: F) -> bool
    where
        F: Fn(&T) -> String,
    {
        self.items.iter().any(|item| key_of(item) == key)
    }

    /// Drops every record whose key equals `key`. Returns whether any was
    /// removed.
    pub fn remove_by<F>(&mut self, key: &str, key_of: F) -> bool
    where
        F: Fn(&T) -> String,
    {
        let before = self.items.len();
        self.items.retain(|item| key_of(item) != key);
        self.items.len() != before
    }

    /// Appends `item` unless a record with the same key is already present.
    pub fn insert_by<F>(&mut self, item: T, key_of: F) -> bool
    where
        F: Fn(&T) -> String,
    {
        let key = key_of(&item);
        if self.contains_by(&key, &key_of) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Replaces any record with the same key; the new one goes to the end.
    pub fn upsert_by<F>(&mut self, item: T, key_of: F)
    where
        F: Fn(&T) -> String,
    {
        let key = key_of(&item);
        self.remove_by(&key, &key_of);
        self.items.push(item);
    }

    /// Replaces the whole content. Later duplicates of a key are dropped.
    pub fn replace_all<I, F>(&mut self, items: I, key_of: F)
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> String,
    {
        self.items.clear();
        for item in items {
            self.insert_by(item, &key_of);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

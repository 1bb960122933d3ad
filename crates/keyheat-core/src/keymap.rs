#![forbid(unsafe_code)]

//! Key layout as reported by the host.
//!
//! A [`Keymap`] is an ordered list of named keys with integer positions. The
//! order defines the key index used everywhere else in the workspace, so a
//! keymap is built once and never reordered.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// KeyPosition
// ---------------------------------------------------------------------------

/// Integer key position in the host's layout space.
///
/// Positions are carried for spatial effects; the heat decay logic never
/// reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyPosition {
    pub x: i32,
    pub y: i32,
}

impl KeyPosition {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for KeyPosition {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// KeyDescriptor
// ---------------------------------------------------------------------------

/// A named key and its position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyDescriptor {
    pub name: String,
    pub position: KeyPosition,
}

impl KeyDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, position: KeyPosition) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

// ---------------------------------------------------------------------------
// Keymap
// ---------------------------------------------------------------------------

/// Ordered key layout with name lookup.
///
/// # Invariants
///
/// 1. Key indices are dense: `0..len()`.
/// 2. Name lookup resolves to the *first* key registered under that name;
///    later duplicates keep their index but are unreachable by name.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    keys: Vec<KeyDescriptor>,
    by_name: HashMap<String, usize>,
}

impl Keymap {
    /// Create an empty keymap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key and return its index.
    pub fn push(&mut self, name: impl Into<String>, position: KeyPosition) -> usize {
        let index = self.keys.len();
        let descriptor = KeyDescriptor::new(name, position);
        if self.by_name.contains_key(&descriptor.name) {
            tracing::debug!(name = %descriptor.name, index, "duplicate key name in keymap");
        } else {
            self.by_name.insert(descriptor.name.clone(), index);
        }
        self.keys.push(descriptor);
        index
    }

    /// Number of keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&KeyDescriptor> {
        self.keys.get(index)
    }

    /// Index of the key named `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Positions in index order, suitable for [`KeyStateStore::initialize`].
    ///
    /// [`KeyStateStore::initialize`]: crate::KeyStateStore::initialize
    pub fn positions(&self) -> impl ExactSizeIterator<Item = KeyPosition> + '_ {
        self.keys.iter().map(|key| key.position)
    }

    /// Iterate over keys in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, KeyDescriptor> {
        self.keys.iter()
    }
}

impl FromIterator<KeyDescriptor> for Keymap {
    fn from_iter<I: IntoIterator<Item = KeyDescriptor>>(iter: I) -> Self {
        let mut keymap = Self::new();
        for key in iter {
            keymap.push(key.name, key.position);
        }
        keymap
    }
}

impl<'a> IntoIterator for &'a Keymap {
    type Item = &'a KeyDescriptor;
    type IntoIter = std::slice::Iter<'a, KeyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

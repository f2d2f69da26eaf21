//! Shared, immutable document text that spans point into.
//!
//! Offsets throughout this crate count characters (Unicode scalar values),
//! so `TargetText` keeps the bookkeeping needed to turn a character offset
//! into a byte offset without rescanning the string on every slice.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::OnceCell;

struct TextInner {
    text: Box<str>,
    char_len: usize,
    /// Byte offset of every character boundary, `char_len + 1` entries.
    /// Never built for ASCII text, where both offsets coincide.
    boundaries: OnceCell<Vec<usize>>,
    digest: OnceCell<u64>,
}

/// A cheaply clonable handle to the text a span column is defined over.
#[derive(Clone)]
pub struct TargetText {
    inner: Arc<TextInner>,
}

impl TargetText {
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let char_len = text.chars().count();
        Self {
            inner: Arc::new(TextInner {
                text: text.into_boxed_str(),
                char_len,
                boundaries: OnceCell::new(),
                digest: OnceCell::new(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner.text
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.inner.char_len
    }

    /// True when both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &TargetText) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn is_ascii(&self) -> bool {
        self.inner.char_len == self.inner.text.len()
    }

    /// Byte offset of the character offset `char_idx`, clamped to the text end.
    pub fn byte_offset(&self, char_idx: usize) -> usize {
        let char_idx = char_idx.min(self.inner.char_len);
        if self.is_ascii() {
            return char_idx;
        }
        let boundaries = self.inner.boundaries.get_or_init(|| {
            let mut boundaries: Vec<usize> = self.inner.text.char_indices().map(|(b, _)| b).collect();
            boundaries.push(self.inner.text.len());
            boundaries
        });
        boundaries[char_idx]
    }

    /// Substring between two character offsets. Offsets past the end are clamped.
    pub fn slice(&self, begin: usize, end: usize) -> &str {
        let begin_byte = self.byte_offset(begin);
        let end_byte = self.byte_offset(end.max(begin));
        &self.inner.text[begin_byte..end_byte]
    }

    /// Content digest, memoized per allocation.
    pub(crate) fn digest(&self) -> u64 {
        *self.inner.digest.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            self.inner.text.hash(&mut hasher);
            hasher.finish()
        })
    }
}

impl PartialEq for TargetText {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.inner.text == other.inner.text
    }
}

impl Eq for TargetText {}

impl Hash for TargetText {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.digest());
    }
}

impl fmt::Debug for TargetText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetText")
            .field("char_len", &self.inner.char_len)
            .field("text", &self.inner.text)
            .finish()
    }
}

impl fmt::Display for TargetText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TargetText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TargetText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{BuildHasher, Hash, Hasher};

use siphasher::sip128::{Hasher128, SipHasher13};

/// Identifies one memoized result.
///
/// A key is a 128-bit hash over the lower-cased name of the function, the
/// types of its arguments and output, and the arguments themselves in call
/// order. The type names act as tags: a function taking `u32` and one taking
/// `&str` never share an entry, even if the arguments would print the same.
/// The arguments are fed through their `Hash` implementations, which are
/// length- or terminator-delimited for strings, slices and tuples, so
/// `("ab", "c")` and `("a", "bc")` are kept apart.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Key(u128);

impl Key {
    /// Derive the key for calling the function `name` with `args` and
    /// producing an `Out`.
    ///
    /// The name must already be lower-cased.
    pub fn new<A, Out>(name: &str, args: &A) -> Self
    where
        A: Hash + ?Sized,
        Out: ?Sized,
    {
        let mut state = SipHasher13::new();
        name.hash(&mut state);
        std::any::type_name::<A>().hash(&mut state);
        std::any::type_name::<Out>().hash(&mut state);
        args.hash(&mut state);
        Self(state.finish128().as_u128())
    }

    /// The raw 128-bit value.
    pub fn as_u128(self) -> u128 {
        self.0
    }
}

// The key already is a hash, so it is written as is. Maps keyed by `Key` use
// the passthrough hasher.
impl Hash for Key {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u128(self.0);
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl Debug for Key {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Key({self})")
    }
}

/// A hash map from keys to values that reuses the key's own hash.
pub(crate) type KeyMap<V> = HashMap<Key, V, BuildKeyHasher>;

/// Builds [`KeyHasher`]s.
#[derive(Copy, Clone, Default)]
pub(crate) struct BuildKeyHasher;

impl BuildHasher for BuildKeyHasher {
    type Hasher = KeyHasher;

    #[inline]
    fn build_hasher(&self) -> KeyHasher {
        KeyHasher(0)
    }
}

/// Takes the low 64 bits of a written key as the bucket hash.
pub(crate) struct KeyHasher(u64);

impl Hasher for KeyHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        debug_assert_eq!(bytes.len(), 16, "only keys can be hashed");
        for (i, byte) in bytes.iter().take(8).enumerate() {
            self.0 ^= u64::from(*byte) << (8 * i);
        }
    }

    #[inline]
    fn write_u128(&mut self, i: u128) {
        self.0 = i as u64;
    }
}

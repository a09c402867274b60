//! Pluggable key hashing, key equality, and value release.
//!
//! A table is parameterized by one implementation of each trait, chosen at
//! construction and fixed for its lifetime. Closures implement all three,
//! so ad-hoc policies do not need a named type.

use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use std::ffi::{CStr, CString};

/// Maps a key to a 32-bit hash. Keys that compare equal under the table's
/// [`KeyEq`] must hash equal.
pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u32;
}

/// Key equality used when scanning a bucket.
pub trait KeyEq<K: ?Sized> {
    fn key_eq(&self, a: &K, b: &K) -> bool;
}

/// Disposes of a value leaving the table through overwrite, removal,
/// `clear`, or drop of the table.
pub trait Release<V> {
    fn release(&mut self, value: V);
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> u32,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u32 {
        self(key)
    }
}

impl<K: ?Sized, F> KeyEq<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

impl<V, F> Release<V> for F
where
    F: FnMut(V),
{
    #[inline]
    fn release(&mut self, value: V) {
        self(value)
    }
}

/// Three rounds of xor-shift-multiply over a 32-bit integer.
#[inline]
pub const fn int_hash(x: u32) -> u32 {
    let x = ((x >> 16) ^ x).wrapping_mul(0x45d9f3b);
    let x = ((x >> 16) ^ x).wrapping_mul(0x45d9f3b);
    (x >> 16) ^ x
}

/// djb2 (`hash * 33 + byte`, seeded with 5381). Stops at the first NUL byte,
/// so `b"ab\0c"` and `b"ab"` hash the same.
#[inline]
pub fn djb2(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .fold(5381u32, |h, &b| (h << 5).wrapping_add(h).wrapping_add(b as u32))
}

/// Integer identity hashing via [`int_hash`]. Signed keys hash their
/// two's-complement bit pattern.
#[derive(Copy, Clone, Debug, Default)]
pub struct IntHash;

macro_rules! int_hash_impl {
    ($($t:ty),*) => {$(
        impl KeyHasher<$t> for IntHash {
            #[inline]
            fn hash_key(&self, key: &$t) -> u32 {
                int_hash(*key as u32)
            }
        }
    )*};
}

int_hash_impl!(u8, u16, u32, i8, i16, i32, char);

/// String hashing via [`djb2`].
#[derive(Copy, Clone, Debug, Default)]
pub struct Djb2;

macro_rules! djb2_impl {
    ($($t:ty => |$k:ident| $bytes:expr),* $(,)?) => {$(
        impl KeyHasher<$t> for Djb2 {
            #[inline]
            fn hash_key(&self, $k: &$t) -> u32 {
                djb2($bytes)
            }
        }
    )*};
}

djb2_impl!(
    str => |key| key.as_bytes(),
    String => |key| key.as_bytes(),
    Box<str> => |key| key.as_bytes(),
    [u8] => |key| key,
    Vec<u8> => |key| key.as_slice(),
    Box<[u8]> => |key| &key[..],
    CStr => |key| key.to_bytes(),
    CString => |key| key.as_bytes(),
);

/// Adapter over a std [`BuildHasher`], folding its 64-bit output to 32 bits.
/// Works for any `K: Hash`, and is the default for [`ChainTable::new`](crate::ChainTable::new).
#[derive(Clone, Debug, Default)]
pub struct StdHash<S = RandomState>(pub S);

impl<K, S> KeyHasher<K> for StdHash<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u32 {
        let h = self.0.hash_one(key);
        (h ^ (h >> 32)) as u32
    }
}

/// Equality through `PartialEq`: integers by value, strings and byte
/// buffers by exact content including length.
#[derive(Copy, Clone, Debug, Default)]
pub struct ByValue;

impl<K: ?Sized + PartialEq> KeyEq<K> for ByValue {
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Releases a value by dropping it.
#[derive(Copy, Clone, Debug, Default)]
pub struct DropValue;

impl<V> Release<V> for DropValue {
    #[inline]
    fn release(&mut self, value: V) {
        drop(value);
    }
}

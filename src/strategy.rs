//! Hash strategies: pure `&str -> u32` digests injected into table calls.
//!
//! Every built-in strategy walks the key's UTF-8 bytes as unsigned values and
//! wraps on 32-bit overflow. An empty key digests to `0`.

/// A pure, deterministic digest of a string key.
///
/// Implementations must return the same digest for the same key for the
/// lifetime of any table they are used with; otherwise `search` and `delete`
/// will address a different bucket than `insert` did.
pub trait HashStrategy {
    fn digest(&self, key: &str) -> u32;
}

impl<F> HashStrategy for F
where
    F: Fn(&str) -> u32,
{
    #[inline]
    fn digest(&self, key: &str) -> u32 {
        self(key)
    }
}

/// Sum of byte values. Anagrams collide.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Sum;

impl HashStrategy for Sum {
    fn digest(&self, key: &str) -> u32 {
        key.bytes().fold(0u32, |h, c| h.wrapping_add(c as u32))
    }
}

/// Bernstein's DJB2: `h = h * 33 + c`, seeded with 5381.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Djb2;

impl HashStrategy for Djb2 {
    fn digest(&self, key: &str) -> u32 {
        if key.is_empty() {
            return 0;
        }
        key.bytes().fold(5381u32, |h, c| {
            (h << 5).wrapping_add(h).wrapping_add(c as u32)
        })
    }
}

/// SDBM: `h = c + (h << 6) + (h << 16) - h`, seeded with 0.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Sdbm;

impl HashStrategy for Sdbm {
    fn digest(&self, key: &str) -> u32 {
        key.bytes().fold(0u32, |h, c| {
            (c as u32)
                .wrapping_add(h << 6)
                .wrapping_add(h << 16)
                .wrapping_sub(h)
        })
    }
}

/// Murmur-style mixing: xor, multiply by `0x5bd1e995`, fold high bits down.
/// Seeded with 5381. Not cryptographic.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Murmur;

const MURMUR_M: u32 = 0x5bd1_e995;

impl HashStrategy for Murmur {
    fn digest(&self, key: &str) -> u32 {
        if key.is_empty() {
            return 0;
        }
        key.bytes().fold(5381u32, |mut h, c| {
            h ^= c as u32;
            h = h.wrapping_mul(MURMUR_M);
            h ^ (h >> 15)
        })
    }
}

/// The four built-in strategies paired with a stable display name.
pub fn builtin_strategies() -> [(&'static str, &'static dyn HashStrategy); 4] {
    [
        ("sum", &Sum),
        ("djb2", &Djb2),
        ("sdbm", &Sdbm),
        ("murmur", &Murmur),
    ]
}

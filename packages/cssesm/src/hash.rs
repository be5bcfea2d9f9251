//! Hash Module
//!
//! Seeded MurmurHash3 (x86, 32-bit) used to derive stylesheet seeds and
//! class-name suffixes.

const C1: u32 = 0xcc9e2d51;
const C2: u32 = 0x1b873593;

/// Hash a string with the given seed.
pub fn hash_str(s: &str, seed: u32) -> u32 {
    murmur3_32(s.as_bytes(), seed)
}

/// Compute the 32 bit MurmurHash3 of the given bytes.
///
/// WARNING: this function has not been designed nor tested with security in mind.
/// DO NOT USE IT IN A SECURITY SENSITIVE CONTEXT.
pub fn murmur3_32(bytes: &[u8], seed: u32) -> u32 {
    let mut h1 = seed;
    let blocks = bytes.len() / 4;

    for i in 0..blocks {
        let k1 = read_u32_le(bytes, i * 4);
        h1 ^= scramble(k1);
        h1 = rol32(h1, 13);
        h1 = add32(h1.wrapping_mul(5), 0xe6546b64);
    }

    let tail = &bytes[blocks * 4..];
    let mut k1 = 0u32;
    if tail.len() >= 3 {
        k1 ^= (tail[2] as u32) << 16;
    }
    if tail.len() >= 2 {
        k1 ^= (tail[1] as u32) << 8;
    }
    if !tail.is_empty() {
        k1 ^= tail[0] as u32;
        h1 ^= scramble(k1);
    }

    h1 ^= bytes.len() as u32;
    fmix32(h1)
}

/// Render a number in base 36 using lower-case digits.
pub fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::with_capacity(7);
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    // Only ASCII digits were pushed
    out.into_iter().map(char::from).collect()
}

fn scramble(k: u32) -> u32 {
    let k = k.wrapping_mul(C1);
    rol32(k, 15).wrapping_mul(C2)
}

fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

fn add32(a: u32, b: u32) -> u32 {
    a.wrapping_add(b)
}

fn rol32(a: u32, count: u32) -> u32 {
    (a << count) | (a >> (32 - count))
}

fn read_u32_le(bytes: &[u8], index: usize) -> u32 {
    u32::from_le_bytes([
        bytes[index],
        bytes[index + 1],
        bytes[index + 2],
        bytes[index + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_match_reference_vectors() {
        assert_eq!(murmur3_32(b"", 0), 0);
        assert_eq!(murmur3_32(b"", 1), 0x514e28b7);
        assert_eq!(
            murmur3_32(b"The quick brown fox jumps over the lazy dog", 0),
            0x2e4ff723
        );
    }

    #[test]
    fn should_depend_on_seed() {
        assert_ne!(hash_str("foo", 1), hash_str("foo", 2));
        assert_eq!(hash_str("foo", 7), hash_str("foo", 7));
    }

    #[test]
    fn should_render_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(u32::MAX), "1z141z3");
    }
}

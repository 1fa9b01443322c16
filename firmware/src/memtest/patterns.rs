//! The individual memory tests. Each writes a window, reads it back and
//! returns the number of words that did not match.

use crate::hw::TestMemory;

/// The walking-bit test only covers this many words at the start of a chunk,
/// one per bit position.
pub const WALKING_BITS_MAX: u32 = 32;

#[inline]
fn word_addr(base: u32, index: u32) -> u32 {
    base.wrapping_add(index.wrapping_mul(4))
}

/// Write `pattern` to `count` words from `base`, then verify.
pub fn fill_and_verify(mem: &mut (impl TestMemory + ?Sized), base: u32, count: u32, pattern: u32) -> u32 {
    for i in 0..count {
        mem.write_word(word_addr(base, i), pattern);
    }

    let mut errors = 0u32;
    for i in 0..count {
        if mem.read_word(word_addr(base, i)) != pattern {
            errors += 1;
        }
    }
    errors
}

/// Walking ones then walking zeros over the first `min(count, 32)` words:
/// word `i` holds only bit `i` set, then only bit `i` clear.
pub fn walking_bits(mem: &mut (impl TestMemory + ?Sized), base: u32, count: u32) -> u32 {
    let span = count.min(WALKING_BITS_MAX);
    let mut errors = 0u32;

    for invert in [false, true] {
        let expected = |i: u32| if invert { !(1u32 << i) } else { 1u32 << i };
        for i in 0..span {
            mem.write_word(word_addr(base, i), expected(i));
        }
        for i in 0..span {
            if mem.read_word(word_addr(base, i)) != expected(i) {
                errors += 1;
            }
        }
    }
    errors
}

/// Store each word's own address in it, then verify. Catches aliased or
/// shorted address lines that the fixed patterns cannot see.
pub fn address_uniqueness(mem: &mut (impl TestMemory + ?Sized), base: u32, count: u32) -> u32 {
    for i in 0..count {
        let addr = word_addr(base, i);
        mem.write_word(addr, addr);
    }

    let mut errors = 0u32;
    for i in 0..count {
        let addr = word_addr(base, i);
        if mem.read_word(addr) != addr {
            errors += 1;
        }
    }
    errors
}

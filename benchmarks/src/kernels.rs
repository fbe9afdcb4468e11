//! Single-threaded age reductions.
//!
//! Every kernel returns the same `u64` for the same users; they differ only in
//! layout and loop shape.

use soa_types::{User, UserColumns};

const UNROLL: usize = 8;
const WORD: usize = std::mem::size_of::<u64>();

/// Array-of-structs scan: touches every `User`, reads one byte of each.
pub fn sum_rows(users: &[User]) -> u64 {
    let mut sum = 0u64;
    for user in users {
        sum += user.age as u64;
    }
    sum
}

/// Struct-of-arrays scan over the contiguous age column.
pub fn sum_columns(users: &UserColumns) -> u64 {
    sum_ages(users.ages())
}

pub fn sum_ages(ages: &[u8]) -> u64 {
    let mut sum = 0u64;
    for &age in ages {
        sum += age as u64;
    }
    sum
}

/// Eight ages per iteration, scalar tail for `len % 8`.
pub fn sum_unrolled(ages: &[u8]) -> u64 {
    let mut blocks = ages.chunks_exact(UNROLL);
    let mut sum = 0u64;
    for b in &mut blocks {
        sum += b[0] as u64
            + b[1] as u64
            + b[2] as u64
            + b[3] as u64
            + b[4] as u64
            + b[5] as u64
            + b[6] as u64
            + b[7] as u64;
    }
    for &age in blocks.remainder() {
        sum += age as u64;
    }
    sum
}

/// Base pointer plus offset, no bounds checks.
pub fn sum_raw_pointer(ages: &[u8]) -> u64 {
    if ages.is_empty() {
        return 0;
    }
    let base = ages.as_ptr();
    let mut sum = 0u64;
    for i in 0..ages.len() {
        // SAFETY: i < ages.len(), so base.add(i) points into the slice.
        sum += unsafe { *base.add(i) } as u64;
    }
    sum
}

/// Adds the eight bytes of `word` without unpacking them one at a time.
#[inline(always)]
fn fold_word(word: u64) -> u64 {
    const BYTE_LANES: u64 = 0x00FF_00FF_00FF_00FF;
    const HALF_LANES: u64 = 0x0000_FFFF_0000_FFFF;

    let pairs = (word & BYTE_LANES) + ((word >> 8) & BYTE_LANES);
    let quads = (pairs & HALF_LANES) + ((pairs >> 16) & HALF_LANES);
    (quads & 0xFFFF_FFFF) + (quads >> 32)
}

/// Loads eight ages as one unaligned word and folds the bytes in-register.
pub fn sum_word_packed(ages: &[u8]) -> u64 {
    let words = ages.len() / WORD;
    let ptr = ages.as_ptr();
    let mut sum = 0u64;
    for w in 0..words {
        // SAFETY: (w + 1) * WORD <= ages.len(); read_unaligned has no alignment requirement.
        let word = unsafe { std::ptr::read_unaligned(ptr.add(w * WORD) as *const u64) };
        sum += fold_word(word);
    }
    for &age in &ages[words * WORD..] {
        sum += age as u64;
    }
    sum
}

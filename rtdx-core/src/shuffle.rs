/// Fixed symbol permutation applied before bit unpacking
use crate::symbols::PASSWORD_SYMBOLS;

/// Source index of each output position
pub const SHUFFLE: [usize; PASSWORD_SYMBOLS] = [
    3, 27, 13, 21, 12, 9, 7, 4, 6, 17, 19, 16, 28, 29, 23, 20, 11, 0, 1, 22, 24, 14, 8, 2, 15,
    25, 10, 5, 18, 26,
];

/// `out[i] = input[SHUFFLE[i]]`
pub fn apply_shuffle<T: Copy + Default>(input: &[T; PASSWORD_SYMBOLS]) -> [T; PASSWORD_SYMBOLS] {
    let mut out = [T::default(); PASSWORD_SYMBOLS];
    for (i, &src) in SHUFFLE.iter().enumerate() {
        out[i] = input[src];
    }
    out
}

/// `out[SHUFFLE[i]] = input[i]`
pub fn unapply_shuffle<T: Copy + Default>(
    input: &[T; PASSWORD_SYMBOLS],
) -> [T; PASSWORD_SYMBOLS] {
    let mut out = [T::default(); PASSWORD_SYMBOLS];
    for (i, &dst) in SHUFFLE.iter().enumerate() {
        out[dst] = input[i];
    }
    out
}

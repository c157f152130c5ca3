//! Subtractive number generator and the additive payload obfuscation

const STATE_LEN: usize = 56;
const SEED_BASE: i32 = 0x9A4EC86;
const MODULUS: i32 = 0x7FFF_FFFF;

/// Add `MODULUS` when `value` is negative, using the sign bit as mask
#[inline]
fn wrap(value: i32) -> i32 {
    ((value >> 31) & MODULUS) + value
}

/// Subtractive generator seeded from a 16-bit value
///
/// All intermediate values stay in `0..MODULUS`, so differences never
/// overflow an `i32`.
pub struct NumberGenerator {
    state: [i32; STATE_LEN],
    i1: usize,
    i2: usize,
}

impl NumberGenerator {
    pub fn new(seed: u16) -> Self {
        let mut seed = SEED_BASE - seed as i32;
        let mut state = [0i32; STATE_LEN];
        state[55] = seed;

        let mut value = 1;
        for x in 1..55 {
            state[(x * 21) % 55] = value;
            let temp = seed - value;
            seed = value;
            value = wrap(temp);
        }

        for _ in 0..4 {
            for x in 0..STATE_LEN {
                let index = ((x + 30) % 55) + 1;
                state[x] = wrap(state[x] - state[index]);
            }
        }

        Self { state, i1: 0, i2: 31 }
    }

    pub fn next_value(&mut self) -> i32 {
        self.i1 += 1;
        self.i2 += 1;
        if self.i1 > 55 {
            self.i1 = 1;
        }
        if self.i2 > 55 {
            self.i2 = 1;
        }

        let mut result = self.state[self.i1] - self.state[self.i2];
        if result < 0 {
            result += MODULUS;
        }
        self.state[self.i1] = result;
        result
    }
}

impl Iterator for NumberGenerator {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        Some(self.next_value())
    }
}

/// Direction of the keystream combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `byte - key`, used when decoding a password
    Decrypt,
    /// `byte + key`, used when encoding a password
    Encrypt,
}

/// Combine the payload with the keystream seeded by its first two bytes
///
/// The first two bytes pass through unchanged. The last byte is masked to
/// the bits that survive the 6-bit symbol packing.
pub fn apply_keystream(code: &[u8], direction: Direction) -> Vec<u8> {
    if code.len() < 2 {
        return code.to_vec();
    }

    let mut out = Vec::with_capacity(code.len());
    out.extend_from_slice(&code[..2]);

    let rng = NumberGenerator::new(u16::from_le_bytes([code[0], code[1]]));
    for (&byte, key) in code[2..].iter().zip(rng) {
        let key = key as u8;
        out.push(match direction {
            Direction::Decrypt => byte.wrapping_sub(key),
            Direction::Encrypt => byte.wrapping_add(key),
        });
    }

    let remain = 8 - (code.len() * 8 % 6) as u32;
    if let Some(last) = out.last_mut() {
        *last &= ((1u16 << remain) - 1) as u8;
    }
    out
}

/// Remove the obfuscation from a freshly unpacked payload
pub fn decrypt_bytes(code: &[u8]) -> Vec<u8> {
    apply_keystream(code, Direction::Decrypt)
}

/// Obfuscate a payload before symbol packing
pub fn encrypt_bytes(code: &[u8]) -> Vec<u8> {
    apply_keystream(code, Direction::Encrypt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_reference_values() {
        let values: Vec<i32> = NumberGenerator::new(0x1234).take(5).collect();
        assert_eq!(
            values,
            vec![216903323, 505240237, 521822898, 1586972305, 2030791474]
        );

        let values: Vec<i32> = NumberGenerator::new(0).take(3).collect();
        assert_eq!(values, vec![1976681210, 551155468, 2145952487]);
    }

    #[test]
    fn test_generator_is_deterministic() {
        let a: Vec<i32> = NumberGenerator::new(0xBEEF).take(200).collect();
        let b: Vec<i32> = NumberGenerator::new(0xBEEF).take(200).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|&v| (0..MODULUS).contains(&v)));

        let c: Vec<i32> = NumberGenerator::new(0xBEEE).take(200).collect();
        assert_ne!(a, c);
    }

    #[test]
    fn test_generator_full_seed_range_stays_positive() {
        for seed in [0u16, 1, 0x00FF, 0x8000, 0xFFFF] {
            let mut rng = NumberGenerator::new(seed);
            for _ in 0..500 {
                assert!(rng.next_value() >= 0);
            }
        }
    }

    #[test]
    fn test_decrypt_reference() {
        let out = decrypt_bytes(&[0x34, 0x12, 0, 0, 0, 0, 0xFF]);
        assert_eq!(out, vec![52, 18, 101, 83, 78, 111, 13]);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        // 23 bytes: the last one holds 4 meaningful bits
        let mut data: Vec<u8> = (0..23u8).map(|x| x.wrapping_mul(53).wrapping_add(7)).collect();
        data[22] &= 0x0F;

        let enc = encrypt_bytes(&data);
        assert_eq!(&enc[..2], &data[..2]);
        assert_ne!(enc, data);
        assert_eq!(decrypt_bytes(&enc), data);
    }

    #[test]
    fn test_tail_mask() {
        // 23 * 8 % 6 == 4 -> keep 4 bits
        let out = encrypt_bytes(&[0u8; 23]);
        assert!(out[22] < 0x10);
        // 24 * 8 % 6 == 0 -> keep all 8 bits
        let data = [0xFFu8; 24];
        let rng_key = NumberGenerator::new(0xFFFF).nth(21).unwrap_or_default() as u8;
        assert_eq!(decrypt_bytes(&data)[23], 0xFFu8.wrapping_sub(rng_key));
    }

    #[test]
    fn test_short_input_passes_through() {
        assert_eq!(decrypt_bytes(&[7]), vec![7]);
        assert!(encrypt_bytes(&[]).is_empty());
    }
}

/// Translation between password text and symbol codes
use crate::error::PasswordError;

/// Number of symbols in a password
pub const PASSWORD_SYMBOLS: usize = 30;

/// Number of characters in a password once whitespace is removed
pub const PASSWORD_CHARS: usize = PASSWORD_SYMBOLS * 2;

/// A password as symbol codes (each in 0..64)
pub type Code = [u8; PASSWORD_SYMBOLS];

/// Symbol tokens in code order: 13 values per suit, suits F H W E S.
/// `XS` does not exist in the game.
pub const SYMBOLS: [&str; 64] = [
    "1F", "2F", "3F", "4F", "5F", "6F", "7F", "8F", "9F", "PF", "MF", "DF", "XF", //
    "1H", "2H", "3H", "4H", "5H", "6H", "7H", "8H", "9H", "PH", "MH", "DH", "XH", //
    "1W", "2W", "3W", "4W", "5W", "6W", "7W", "8W", "9W", "PW", "MW", "DW", "XW", //
    "1E", "2E", "3E", "4E", "5E", "6E", "7E", "8E", "9E", "PE", "ME", "DE", "XE", //
    "1S", "2S", "3S", "4S", "5S", "6S", "7S", "8S", "9S", "PS", "MS", "DS",
];

/// Strip all whitespace and upper-case the password
pub fn normalize(password: &str) -> String {
    password
        .split_whitespace()
        .collect::<String>()
        .to_uppercase()
}

/// Parse password text into symbol codes
///
/// The whole password is rejected on the first bad token.
pub fn parse(password: &str) -> Result<Code, PasswordError> {
    let chars: Vec<char> = normalize(password).chars().collect();
    if chars.len() != PASSWORD_CHARS {
        return Err(PasswordError::InvalidLength {
            expected: PASSWORD_CHARS,
            actual: chars.len(),
        });
    }

    let mut code = [0u8; PASSWORD_SYMBOLS];
    for (position, pair) in chars.chunks_exact(2).enumerate() {
        let token: String = pair.iter().collect();
        let index = SYMBOLS
            .iter()
            .position(|&symbol| symbol == token)
            .ok_or(PasswordError::InvalidSymbol { position, token })?;
        code[position] = index as u8;
    }

    Ok(code)
}

/// Render symbol codes as password text
///
/// Groups of 5 symbols are separated by a space, 15 symbols per line.
pub fn render(code: &Code) -> String {
    let mut text = String::with_capacity(PASSWORD_CHARS + PASSWORD_SYMBOLS / 5);
    for (i, &value) in code.iter().enumerate() {
        if i > 0 {
            if i % 15 == 0 {
                text.push('\n');
            } else if i % 5 == 0 {
                text.push(' ');
            }
        }
        debug_assert!((value as usize) < SYMBOLS.len());
        text.push_str(SYMBOLS[value as usize & 0x3F]);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVIVE_PASSWORD: &str = "DE2W6H8WMS 8F9H7W4EMW 3F7HXW4H9S\nPS4F9W4H1W 5E7W5W2F5F 8FDW2F5WPW";
    const REVIVE_CODE: Code = [
        50, 27, 18, 33, 62, 7, 21, 32, 42, 36, 2, 19, 38, 16, 60, 61, 3, 34, 16, 26, 43, 32, 30,
        1, 4, 7, 37, 1, 30, 35,
    ];

    #[test]
    fn test_symbol_table_is_unique() {
        for (i, a) in SYMBOLS.iter().enumerate() {
            for b in &SYMBOLS[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(!SYMBOLS.contains(&"XS"));
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse(REVIVE_PASSWORD).unwrap(), REVIVE_CODE);
    }

    #[test]
    fn test_parse_ignores_whitespace_and_case() {
        let messy = "de2w 6h8w ms8f9h7w4emw\t3f7hxw4h9s ps4f9w4h1w5e7w5w2f5f\r\n8fdw2f5wpw";
        assert_eq!(parse(messy).unwrap(), REVIVE_CODE);
    }

    #[test]
    fn test_render_reference() {
        assert_eq!(render(&REVIVE_CODE), REVIVE_PASSWORD);
    }

    #[test]
    fn test_render_parse_is_stable() {
        let messy = "de2w6h8wms8f9h7w4emw3f7hxw4h9sps4f9w4h1w5e7w5w2f5f8fdw2f5wpw";
        let code = parse(messy).unwrap();
        assert_eq!(render(&code), REVIVE_PASSWORD);
        assert_eq!(parse(&render(&code)).unwrap(), code);
        assert_eq!(normalize(&render(&code)), normalize(messy));
    }

    #[test]
    fn test_every_symbol_parses() {
        let mut code = [0u8; PASSWORD_SYMBOLS];
        for start in (0..64).step_by(PASSWORD_SYMBOLS) {
            for (i, value) in code.iter_mut().enumerate() {
                *value = ((start + i) % 64) as u8;
            }
            assert_eq!(parse(&render(&code)).unwrap(), code);
        }
    }

    #[test]
    fn test_short_password() {
        let short = &normalize(REVIVE_PASSWORD)[..59];
        assert_eq!(
            parse(short),
            Err(PasswordError::InvalidLength {
                expected: 60,
                actual: 59
            })
        );
    }

    #[test]
    fn test_long_password() {
        let long = format!("{}1F", REVIVE_PASSWORD);
        assert!(matches!(
            parse(&long),
            Err(PasswordError::InvalidLength { actual: 62, .. })
        ));
    }

    #[test]
    fn test_unknown_symbol() {
        let bad = REVIVE_PASSWORD.replacen("MS", "XS", 1);
        assert_eq!(
            parse(&bad),
            Err(PasswordError::InvalidSymbol {
                position: 4,
                token: "XS".to_string()
            })
        );
    }

    #[test]
    fn test_non_ascii_counts_characters() {
        let password = format!("{}★", &normalize(REVIVE_PASSWORD)[..58]);
        assert!(matches!(
            parse(&password),
            Err(PasswordError::InvalidLength { actual: 59, .. })
        ));
        let password = format!("{}★F", &normalize(REVIVE_PASSWORD)[..58]);
        assert!(matches!(
            parse(&password),
            Err(PasswordError::InvalidSymbol { position: 29, .. })
        ));
    }
}

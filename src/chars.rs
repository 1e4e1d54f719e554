//! PDF character classes (ISO 32000-1:2008, Section 7.2.2).
//!
//! Every byte is exactly one of whitespace, delimiter or regular.

/// White-space characters (Table 1): NUL, TAB, LF, FF, CR, SPACE.
pub const WHITESPACE: &[u8] = b"\x00\x09\x0a\x0c\x0d\x20";

/// Delimiter characters (Table 2).
pub const DELIMITERS: &[u8] = b"()<>[]{}/%";

/// Returns true for PDF whitespace.
#[inline]
pub fn is_whitespace(c: u8) -> bool {
    WHITESPACE.contains(&c)
}

/// Returns true for PDF delimiters.
#[inline]
pub fn is_delimiter(c: u8) -> bool {
    DELIMITERS.contains(&c)
}

/// Returns true for bytes that may appear inside a keyword, number or name.
#[inline]
pub fn is_regular(c: u8) -> bool {
    !is_whitespace(c) && !is_delimiter(c)
}

/// Value of an ASCII hex digit.
#[inline]
pub fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_partition_all_bytes() {
        for c in 0..=255u8 {
            let classes = [is_whitespace(c), is_delimiter(c), is_regular(c)];
            assert_eq!(classes.iter().filter(|&&b| b).count(), 1, "byte {:#04x}", c);
        }
    }

    #[test]
    fn test_class_members() {
        let whitespace: Vec<u8> = (0..=255u8).filter(|&c| is_whitespace(c)).collect();
        assert_eq!(whitespace, vec![0x00, b'\t', b'\n', 0x0C, b'\r', b' ']);

        let mut delimiters: Vec<u8> = (0..=255u8).filter(|&c| is_delimiter(c)).collect();
        delimiters.sort_unstable();
        let mut expected = b"%()/<>[]{}".to_vec();
        expected.sort_unstable();
        assert_eq!(delimiters, expected);
    }

    #[test]
    fn test_hash_and_high_bytes_are_regular() {
        assert!(is_regular(b'#'));
        assert!(is_regular(0x80));
        assert!(is_regular(0xFF));
        // vertical tab is not PDF whitespace
        assert!(is_regular(0x0B));
    }

    #[test]
    fn test_hex_value() {
        assert_eq!(hex_value(b'0'), Some(0));
        assert_eq!(hex_value(b'a'), Some(10));
        assert_eq!(hex_value(b'F'), Some(15));
        assert_eq!(hex_value(b'g'), None);
        assert_eq!(hex_value(b' '), None);
    }
}

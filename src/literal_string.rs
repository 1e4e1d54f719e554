//! Literal string sub-lexer (ISO 32000-1:2008, Section 7.3.4.2).
//!
//! Literal strings are enclosed in `(` and `)` and may contain balanced
//! nested parentheses and backslash escapes:
//!
//! | Source | Meaning |
//! |---|---|
//! | `\n \r \t \b \f` | control characters |
//! | `\( \) \\` | the literal character |
//! | `\ddd` | one byte, 1 to 3 digits read as base 8, taken modulo 256 |
//! | `\` + EOL | line continuation, contributes nothing |
//!
//! A backslash before any other byte is an unrecognized escape: the
//! backslash and that byte are both dropped and contribute nothing.

use crate::error::{Error, LiteralKind, Result};
use crate::token::{SubToken, SubTokenKind};

/// Scan the literal string whose opening `(` is at `open`.
///
/// Returns the pieces between the parentheses and the offset just past the
/// closing `)`. The scan never reads at or beyond `end`.
///
/// # Errors
///
/// Returns [`Error::UnterminatedLiteral`] if the parentheses are still
/// unbalanced at `end`.
pub fn scan_literal_string(
    source: &[u8],
    open: usize,
    end: usize,
) -> Result<(Vec<SubToken<'_>>, usize)> {
    let unterminated = || Error::UnterminatedLiteral {
        offset: open,
        kind: LiteralKind::String,
    };

    let mut subs = Vec::new();
    let mut depth = 1usize;
    let mut cursor = open + 1;

    loop {
        let landmark = source[cursor..end]
            .iter()
            .position(|&c| matches!(c, b'(' | b')' | b'\\'))
            .map(|p| cursor + p)
            .ok_or_else(unterminated)?;

        if landmark > cursor {
            subs.push(SubToken {
                start: cursor,
                end: landmark,
                kind: SubTokenKind::Literal(&source[cursor..landmark]),
            });
        }

        match source[landmark] {
            b'(' => {
                depth += 1;
                subs.push(nested(landmark, b'('));
                cursor = landmark + 1;
            },
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((subs, landmark + 1));
                }
                subs.push(nested(landmark, b')'));
                cursor = landmark + 1;
            },
            _ => {
                let code_at = landmark + 1;
                if code_at >= end {
                    return Err(unterminated());
                }
                cursor = scan_escape(source, landmark, end, &mut subs);
            },
        }
    }
}

fn nested(at: usize, paren: u8) -> SubToken<'static> {
    SubToken {
        start: at,
        end: at + 1,
        kind: SubTokenKind::Nested(paren),
    }
}

/// Decode the escape whose backslash is at `backslash`, pushing a piece if it
/// produces content. Returns the offset to resume scanning from.
fn scan_escape(source: &[u8], backslash: usize, end: usize, subs: &mut Vec<SubToken<'_>>) -> usize {
    let code_at = backslash + 1;
    let code = source[code_at];

    let value = match code {
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'(' | b')' | b'\\' => Some(code),
        _ => None,
    };
    if let Some(value) = value {
        subs.push(SubToken {
            start: backslash,
            end: code_at + 1,
            kind: SubTokenKind::Escape { code, value },
        });
        return code_at + 1;
    }

    match code {
        b'\r' if code_at + 1 < end && source[code_at + 1] == b'\n' => code_at + 2,
        b'\r' | b'\n' => code_at + 1,
        // `8` and `9` are accepted and weighted as base 8
        b'0'..=b'9' => {
            let mut value: u16 = 0;
            let mut digits = 0u8;
            let mut at = code_at;
            while digits < 3 && at < end && source[at].is_ascii_digit() {
                value = (value << 3) + u16::from(source[at] - b'0');
                digits += 1;
                at += 1;
            }
            subs.push(SubToken {
                start: backslash,
                end: at,
                kind: SubTokenKind::Octal {
                    value: (value & 0xFF) as u8,
                    digits,
                },
            });
            at
        },
        // Unrecognized escape: drop the backslash and the byte after it
        _ => code_at + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &[u8]) -> (Vec<SubToken<'_>>, usize) {
        scan_literal_string(input, 0, input.len()).unwrap()
    }

    fn decoded(subs: &[SubToken<'_>]) -> Vec<u8> {
        subs.iter().flat_map(|s| s.content().iter().copied()).collect()
    }

    #[test]
    fn test_simple_string() {
        let (subs, next) = scan(b"(abc)");
        assert_eq!(next, 5);
        assert_eq!(
            subs,
            vec![SubToken {
                start: 1,
                end: 4,
                kind: SubTokenKind::Literal(b"abc"),
            }]
        );
    }

    #[test]
    fn test_empty_string() {
        let (subs, next) = scan(b"()");
        assert!(subs.is_empty());
        assert_eq!(next, 2);
    }

    #[test]
    fn test_stops_at_closing_paren() {
        let input = b"(x) (y)";
        let (subs, next) = scan_literal_string(input, 0, input.len()).unwrap();
        assert_eq!(next, 3);
        assert_eq!(decoded(&subs), b"x");
    }

    #[test]
    fn test_nested_parens_are_content() {
        let (subs, next) = scan(b"(a(b)c)");
        assert_eq!(next, 7);
        assert_eq!(decoded(&subs), b"a(b)c");
        let kinds: Vec<_> = subs.iter().map(|s| s.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                SubTokenKind::Literal(b"a"),
                SubTokenKind::Nested(b'('),
                SubTokenKind::Literal(b"b"),
                SubTokenKind::Nested(b')'),
                SubTokenKind::Literal(b"c"),
            ]
        );
    }

    #[test]
    fn test_deeply_nested() {
        let (subs, next) = scan(b"(((x)))");
        assert_eq!(next, 7);
        assert_eq!(decoded(&subs), b"((x))");
    }

    #[test]
    fn test_named_escapes() {
        let (subs, _) = scan(b"(\\n\\r\\t\\b\\f\\(\\)\\\\)");
        assert_eq!(decoded(&subs), b"\n\r\t\x08\x0C()\\");
        assert!(subs
            .iter()
            .all(|s| matches!(s.kind, SubTokenKind::Escape { .. }) && s.end - s.start == 2));
    }

    #[test]
    fn test_escaped_parens_do_not_change_depth() {
        let (subs, next) = scan(b"(\\(x)");
        assert_eq!(next, 5);
        assert_eq!(decoded(&subs), b"(x");
    }

    #[test]
    fn test_octal_escapes() {
        let (subs, _) = scan(b"(\\101\\7\\53x)");
        assert_eq!(decoded(&subs), b"A\x07+x");
        assert_eq!(
            subs[0].kind,
            SubTokenKind::Octal {
                value: b'A',
                digits: 3
            }
        );
        assert_eq!(subs[1].kind, SubTokenKind::Octal { value: 7, digits: 1 });
        assert_eq!(
            subs[2].kind,
            SubTokenKind::Octal {
                value: b'+',
                digits: 2
            }
        );
        assert_eq!((subs[2].start, subs[2].end), (7, 10));
    }

    #[test]
    fn test_octal_escape_stops_after_three_digits() {
        let (subs, _) = scan(b"(\\0612)");
        assert_eq!(decoded(&subs), b"12");
        assert_eq!(subs[0].kind, SubTokenKind::Octal { value: b'1', digits: 3 });
        assert_eq!(subs[1].kind, SubTokenKind::Literal(b"2"));
    }

    #[test]
    fn test_octal_escape_wraps_modulo_256() {
        let (subs, _) = scan(b"(\\777)");
        assert_eq!(subs[0].kind, SubTokenKind::Octal { value: 0xFF, digits: 3 });
        let (subs, _) = scan(b"(\\400)");
        assert_eq!(subs[0].kind, SubTokenKind::Octal { value: 0, digits: 3 });
    }

    #[test]
    fn test_line_continuation() {
        let inputs: [&[u8]; 3] = [b"(ab\\\ncd)", b"(ab\\\rcd)", b"(ab\\\r\ncd)"];
        for input in inputs {
            let (subs, next) = scan(input);
            assert_eq!(next, input.len());
            assert_eq!(decoded(&subs), b"abcd", "input {:?}", input);
            assert_eq!(subs.len(), 2);
        }
    }

    #[test]
    fn test_unrecognized_escape_produces_nothing() {
        let (subs, next) = scan(b"(a\\qb)");
        assert_eq!(next, 6);
        assert_eq!(decoded(&subs), b"ab");
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].kind, SubTokenKind::Literal(b"b"));
        assert_eq!(subs[1].start, 4);
    }

    #[test]
    fn test_unrecognized_escape_before_close() {
        let (subs, next) = scan(b"(\\q)");
        assert_eq!(next, 4);
        assert!(subs.is_empty());
    }

    #[test]
    fn test_eight_and_nine_start_octal_escape() {
        let (subs, next) = scan(b"(\\8)");
        assert_eq!(next, 4);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].kind, SubTokenKind::Octal { value: 8, digits: 1 });
        assert_eq!(decoded(&subs), b"\x08");

        // 1 * 8 + 8
        let (subs, _) = scan(b"(\\18)");
        assert_eq!(subs[0].kind, SubTokenKind::Octal { value: 16, digits: 2 });
        assert_eq!((subs[0].start, subs[0].end), (1, 4));

        // (9 * 8 + 9) * 8 + 9 = 657, wrapped
        let (subs, _) = scan(b"(\\9999)");
        assert_eq!(subs[0].kind, SubTokenKind::Octal { value: 145, digits: 3 });
        assert_eq!(subs[1].kind, SubTokenKind::Literal(b"9"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = scan_literal_string(b"(abc", 0, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::UnterminatedLiteral {
                offset: 0,
                kind: LiteralKind::String
            }
        ));
    }

    #[test]
    fn test_unbalanced_nested_is_unterminated() {
        assert!(scan_literal_string(b"(a(b)", 0, 5).is_err());
    }

    #[test]
    fn test_trailing_backslash_is_unterminated() {
        assert!(scan_literal_string(b"(abc\\", 0, 5).is_err());
    }

    #[test]
    fn test_respects_end_bound() {
        // closing paren exists but lies beyond `end`
        assert!(scan_literal_string(b"(abc)", 0, 4).is_err());
    }

    #[test]
    fn test_starts_mid_buffer() {
        let input = b"xx(hi)yy";
        let (subs, next) = scan_literal_string(input, 2, input.len()).unwrap();
        assert_eq!(next, 6);
        assert_eq!(subs[0].start, 3);
        assert_eq!(decoded(&subs), b"hi");
    }
}

//! Numeric object recognition (ISO 32000-1:2008, Section 7.3.3).
//!
//! PDF numbers are an optional sign, digits, and at most one decimal point.
//! Exponents (`1e5`) and radix notation (`16#FF`) are not PDF syntax, so such
//! runs lex as keywords.

use nom::{
    IResult,
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, opt},
    sequence::preceded,
};

/// Value of a numeric token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer (e.g., 42, -123, +17)
    Integer(i64),
    /// Real (e.g., 3.14, -.002, 5.)
    Real(f64),
}

impl Number {
    /// Value as a float, regardless of variant.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(n) => n as f64,
            Number::Real(r) => r,
        }
    }
}

/// Sign, integer digits, and fractional digits (`Some(None)` for a bare `.`).
type NumberParts<'a> = (Option<char>, Option<&'a [u8]>, Option<Option<&'a [u8]>>);

fn number_parts(input: &[u8]) -> IResult<&[u8], NumberParts<'_>> {
    let (input, sign) = opt(one_of("+-"))(input)?;
    let (input, int_part) = opt(digit1)(input)?;
    let (input, frac_part) = opt(preceded(char('.'), opt(digit1)))(input)?;
    Ok((input, (sign, int_part, frac_part)))
}

/// Parse a complete bare run as a PDF number.
///
/// Returns `None` when the run is anything else (including `+`, `-`, `.`
/// and `1.2.3`), in which case the run is a keyword.
pub fn parse_number(run: &[u8]) -> Option<Number> {
    let (_, (sign, int_part, frac_part)) = all_consuming(number_parts)(run).ok()?;

    let frac_digits = frac_part.flatten();
    if int_part.is_none() && frac_digits.is_none() {
        return None;
    }

    // Every byte is an ASCII sign, digit or '.', so this cannot fail.
    let text = std::str::from_utf8(run).ok()?;

    if frac_part.is_some() {
        let mut normalized = String::with_capacity(text.len() + 2);
        if sign == Some('-') {
            normalized.push('-');
        }
        normalized.push_str(std::str::from_utf8(int_part.unwrap_or(&b"0"[..])).ok()?);
        normalized.push('.');
        normalized.push_str(std::str::from_utf8(frac_digits.unwrap_or(&b"0"[..])).ok()?);
        return normalized.parse().ok().map(Number::Real);
    }

    match text.parse::<i64>() {
        Ok(n) => Some(Number::Integer(n)),
        // Too many digits for i64: still a number, keep the magnitude
        Err(_) => text.parse::<f64>().ok().map(Number::Real),
    }
}

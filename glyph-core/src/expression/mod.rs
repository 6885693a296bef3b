//! Spell expression evaluation.
//!
//! Casts are plain arithmetic over the glyph bank: digits, `+ - × ÷ ^` and
//! parentheses. Text is tokenized and run through a recursive-descent parser;
//! nothing is ever executed from the player's input.

mod parser;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use parser::MAX_NESTING;

/// Display glyph for multiplication
pub const TIMES: char = '×';

/// Display glyph for division
pub const DIVIDE: char = '÷';

/// Power glyph (shared by display and evaluation)
pub const POWER: char = '^';

/// Why an expression could not be turned into a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EvalError {
    #[error("unknown glyph {0:?}")]
    IllegalGlyph(char),
    #[error("malformed expression")]
    Malformed,
    #[error("result is not finite")]
    NonFinite,
}

/// Binary and unary operators after glyph normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    /// Maps a display or ASCII glyph to its operator
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' | TIMES => Some(Self::Mul),
            '/' | DIVIDE => Some(Self::Div),
            POWER => Some(Self::Pow),
            _ => None,
        }
    }

    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Pow => lhs.powf(rhs),
        }
    }

    /// Glyph shown to the player
    pub fn display_glyph(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => TIMES,
            Self::Div => DIVIDE,
            Self::Pow => POWER,
        }
    }
}

/// True for glyphs that count as operators (parentheses excluded)
pub fn is_operator_glyph(c: char) -> bool {
    Operator::from_glyph(c).is_some()
}

/// Evaluates a spell expression.
///
/// Precedence from tightest: `^` (right-associative), unary sign, `× ÷`,
/// `+ -`. Any character outside the grammar fails with
/// [`EvalError::IllegalGlyph`] before parsing starts.
pub fn evaluate(raw: &str) -> Result<f64, EvalError> {
    if let Some(bad) = raw.chars().find(|c| !is_legal_char(*c)) {
        return Err(EvalError::IllegalGlyph(bad));
    }

    let tokens = parser::tokenize(raw)?;
    let value = parser::Parser::new(&tokens).parse()?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

fn is_legal_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '(' || c == ')' || c.is_whitespace() || is_operator_glyph(c)
}

/// Whole numbers at or past this magnitude print in exponent form
const PLAIN_DIGITS_LIMIT: f64 = 1e21;

/// Formats a cast result for display: integers as-is, everything else with
/// at most two decimals and no trailing zeros. Huge integers print as
/// `2.9512665430652752e+94`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        if value == 0.0 {
            return "0".to_string();
        }
        if value.abs() < PLAIN_DIGITS_LIMIT {
            return format!("{value}");
        }
        let sci = format!("{value:e}");
        return match sci.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => sci,
        };
    }
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(s: &str) -> f64 {
        evaluate(s).unwrap()
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(eval("2+3"), 5.0);
        assert_eq!(eval("7-10"), -3.0);
        assert_eq!(eval("6×7"), 42.0);
        assert_eq!(eval("9÷3"), 3.0);
        assert_eq!(eval("6*7"), 42.0);
        assert_eq!(eval("9/2"), 4.5);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+3×4"), 14.0);
        assert_eq!(eval("(2+3)×4"), 20.0);
        assert_eq!(eval("2×3^2"), 18.0);
        assert_eq!(eval("8-4-2"), 2.0);
        assert_eq!(eval("8÷4÷2"), 1.0);
    }

    #[test]
    fn test_power_right_associative() {
        assert_eq!(eval("2^3^2"), 512.0);
        assert_eq!(eval("(2^3)^2"), 64.0);
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        assert_eq!(eval("-2^2"), -4.0);
        assert_eq!(eval("(-2)^2"), 4.0);
        assert_eq!(eval("2^-1"), 0.5);
        assert_eq!(eval("-3×-3"), 9.0);
        assert_eq!(eval("2--3"), 5.0);
    }

    #[test]
    fn test_multi_digit_and_decimal() {
        assert_eq!(eval("12+30"), 42.0);
        assert_eq!(eval("1.5×2"), 3.0);
        assert_eq!(eval(".5+.5"), 1.0);
    }

    #[test]
    fn test_whitespace_ignored_between_tokens() {
        assert_eq!(eval(" 2 + 3 × 4 "), 14.0);
    }

    #[test]
    fn test_division_by_zero_is_non_finite() {
        assert_eq!(evaluate("8÷0"), Err(EvalError::NonFinite));
        assert_eq!(evaluate("0÷0"), Err(EvalError::NonFinite));
        assert_eq!(evaluate("0^-1"), Err(EvalError::NonFinite));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(evaluate("2+"), Err(EvalError::Malformed));
        assert_eq!(evaluate("(2+3"), Err(EvalError::Malformed));
        assert_eq!(evaluate("2+3)"), Err(EvalError::Malformed));
        assert_eq!(evaluate("()"), Err(EvalError::Malformed));
        assert_eq!(evaluate(""), Err(EvalError::Malformed));
        assert_eq!(evaluate("2(3)"), Err(EvalError::Malformed));
        assert_eq!(evaluate("1 2"), Err(EvalError::Malformed));
        assert_eq!(evaluate("1.2.3"), Err(EvalError::Malformed));
        assert_eq!(evaluate("2××3"), Err(EvalError::Malformed));
        assert_eq!(evaluate("×3"), Err(EvalError::Malformed));
    }

    #[test]
    fn test_illegal_glyph() {
        assert_eq!(evaluate("2#3"), Err(EvalError::IllegalGlyph('#')));
        assert_eq!(evaluate("x+1"), Err(EvalError::IllegalGlyph('x')));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        assert_eq!(evaluate(&deep), Err(EvalError::Malformed));
        let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(evaluate(&ok), Ok(1.0));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-7.0), "-7");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1.0 / 3.0), "0.33");
        assert_eq!(format_number(2.999), "3");
        assert_eq!(format_number(-0.001), "0");
    }

    #[test]
    fn test_format_huge_results() {
        assert_eq!(format_number(eval("9^99")), "2.9512665430652752e+94");
        assert_eq!(format_number(eval("-(9^99)")), "-2.9512665430652752e+94");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }

    #[test]
    fn test_operator_glyphs() {
        assert!(is_operator_glyph('×'));
        assert!(is_operator_glyph('*'));
        assert!(is_operator_glyph('^'));
        assert!(!is_operator_glyph('('));
        assert_eq!(Operator::Mul.display_glyph(), TIMES);
    }
}

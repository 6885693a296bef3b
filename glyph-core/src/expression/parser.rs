use super::{EvalError, Operator};

/// Deepest parenthesis / unary-sign nesting the parser accepts
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Token {
    Number(f64),
    Op(Operator),
    Open,
    Close,
}

/// Splits normalized text into tokens. Assumes every character is legal.
pub(super) fn tokenize(raw: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_digit() || c == '.' {
            let mut literal = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    literal.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            // "." alone and "1.2.3" both fail here
            let value: f64 = literal.parse().map_err(|_| EvalError::Malformed)?;
            tokens.push(Token::Number(value));
        } else if c == '(' {
            tokens.push(Token::Open);
            chars.next();
        } else if c == ')' {
            tokens.push(Token::Close);
            chars.next();
        } else if let Some(op) = Operator::from_glyph(c) {
            tokens.push(Token::Op(op));
            chars.next();
        } else {
            return Err(EvalError::IllegalGlyph(c));
        }
    }

    Ok(tokens)
}

pub(super) struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parses the whole token stream; leftover tokens are malformed.
    pub(super) fn parse(mut self) -> Result<f64, EvalError> {
        let value = self.sum()?;
        if self.pos != self.tokens.len() {
            return Err(EvalError::Malformed);
        }
        Ok(value)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            Err(EvalError::Malformed)
        } else {
            Ok(())
        }
    }

    // sum := product (('+' | '-') product)*
    fn sum(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.product()?;
        while let Some(Token::Op(op @ (Operator::Add | Operator::Sub))) = self.peek() {
            self.pos += 1;
            let rhs = self.product()?;
            acc = op.apply(acc, rhs);
        }
        Ok(acc)
    }

    // product := signed (('×' | '÷') signed)*
    fn product(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.signed()?;
        while let Some(Token::Op(op @ (Operator::Mul | Operator::Div))) = self.peek() {
            self.pos += 1;
            let rhs = self.signed()?;
            acc = op.apply(acc, rhs);
        }
        Ok(acc)
    }

    // signed := ('-' | '+') signed | power
    fn signed(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(Token::Op(Operator::Sub)) => {
                self.pos += 1;
                self.descend()?;
                let value = self.signed()?;
                self.depth -= 1;
                Ok(-value)
            }
            Some(Token::Op(Operator::Add)) => {
                self.pos += 1;
                self.descend()?;
                let value = self.signed()?;
                self.depth -= 1;
                Ok(value)
            }
            _ => self.power(),
        }
    }

    // power := atom ('^' signed)?
    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.atom()?;
        if let Some(Token::Op(Operator::Pow)) = self.peek() {
            self.pos += 1;
            self.descend()?;
            let exponent = self.signed()?;
            self.depth -= 1;
            return Ok(Operator::Pow.apply(base, exponent));
        }
        Ok(base)
    }

    // atom := number | '(' sum ')'
    fn atom(&mut self) -> Result<f64, EvalError> {
        match self.bump() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::Open) => {
                self.descend()?;
                let value = self.sum()?;
                self.depth -= 1;
                match self.bump() {
                    Some(Token::Close) => Ok(value),
                    _ => Err(EvalError::Malformed),
                }
            }
            _ => Err(EvalError::Malformed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_mixed_glyphs() {
        let tokens = tokenize("12×(3-4.5)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(12.0),
                Token::Op(Operator::Mul),
                Token::Open,
                Token::Number(3.0),
                Token::Op(Operator::Sub),
                Token::Number(4.5),
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_tokenize_lone_dot() {
        assert_eq!(tokenize("."), Err(EvalError::Malformed));
    }

    #[test]
    fn test_parser_rejects_trailing_tokens() {
        let tokens = tokenize("2 3").unwrap();
        assert_eq!(Parser::new(&tokens).parse(), Err(EvalError::Malformed));
    }

    #[test]
    fn test_power_chain_exponent_is_signed() {
        let tokens = tokenize("2^-2^2").unwrap();
        // 2^(-(2^2))
        assert_eq!(Parser::new(&tokens).parse(), Ok(2f64.powf(-4.0)));
    }
}

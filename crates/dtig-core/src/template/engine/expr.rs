//! Condition expressions: lexer, LL(1) recursive-descent parser, evaluator
//!
//! ```text
//! test       := and_test ("OR" and_test)*
//! and_test   := not_test ("AND" not_test)*
//! not_test   := "NOT" not_test | "HAS" not_test | comparison
//! comparison := arith (comp_op arith)?
//! arith      := term (("+" | "-") term)*
//! term       := factor (("*" | "/" | "%") factor)*
//! factor     := ("+" | "-") factor | atom
//! atom       := NAME "(" test ")" | NAME | INTEGER | "(" test ")"
//! ```
//!
//! Every decision is made on the next token alone. A second comparison
//! operator after a comparison is rejected rather than chained.

use super::tokenize::InlineFunction;
use crate::template::value::{Number, Value};

/// Failure while parsing or evaluating a condition
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExprError {
    /// Text is not a valid expression, or calls an unknown function
    Grammar(String),
    /// Operand types or values do not support the operation
    Evaluation(String),
    /// An inline function was called but no callback was injected
    MissingCallback(InlineFunction),
}

type ExprResult<T> = Result<T, ExprError>;

/// Name lookup and function calls available to the evaluator
pub(crate) trait Environment {
    fn resolve(&self, name: &str) -> Value;

    fn call(&self, function: InlineFunction, argument: &Value) -> ExprResult<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Lt,
    Gt,
    Eq,
    Ge,
    Le,
    Ne,
    In,
    NotIn,
    Is,
    IsNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Parsed condition
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Name(String),
    Int(i64),
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Has(Box<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    Arith(ArithOp, Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Pos(Box<Expr>),
    Call(InlineFunction, Box<Expr>),
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Name(String),
    Int(i64),
    Or,
    And,
    Not,
    Has,
    In,
    Is,
    Lt,
    Gt,
    EqEq,
    Ge,
    Le,
    Ne,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Comma,
}

impl Lexeme {
    fn describe(&self) -> String {
        match self {
            Lexeme::Name(name) => format!("'{}'", name),
            Lexeme::Int(i) => format!("'{}'", i),
            Lexeme::Or => "'OR'".to_string(),
            Lexeme::And => "'AND'".to_string(),
            Lexeme::Not => "'NOT'".to_string(),
            Lexeme::Has => "'HAS'".to_string(),
            Lexeme::In => "'IN'".to_string(),
            Lexeme::Is => "'IS'".to_string(),
            Lexeme::Lt => "'<'".to_string(),
            Lexeme::Gt => "'>'".to_string(),
            Lexeme::EqEq => "'=='".to_string(),
            Lexeme::Ge => "'>='".to_string(),
            Lexeme::Le => "'<='".to_string(),
            Lexeme::Ne => "'!='".to_string(),
            Lexeme::Plus => "'+'".to_string(),
            Lexeme::Minus => "'-'".to_string(),
            Lexeme::Star => "'*'".to_string(),
            Lexeme::Slash => "'/'".to_string(),
            Lexeme::Percent => "'%'".to_string(),
            Lexeme::LParen => "'('".to_string(),
            Lexeme::RParen => "')'".to_string(),
            Lexeme::Comma => "','".to_string(),
        }
    }
}

fn lex(source: &str) -> ExprResult<Vec<Lexeme>> {
    let mut lexemes = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                lexemes.push(keyword_or_name(&source[start..end]));
            }
            c if c.is_ascii_digit() => {
                let mut end = start;
                let mut fractional = false;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() {
                        end = i + 1;
                    } else if c == '.' || c == 'e' || c == 'E' {
                        fractional = true;
                        end = i + 1;
                    } else if fractional && (c == '+' || c == '-') && source[..i].ends_with(['e', 'E']) {
                        end = i + 1;
                    } else {
                        break;
                    }
                    chars.next();
                }
                let literal = &source[start..end];
                if fractional {
                    return Err(ExprError::Grammar(format!(
                        "Only integers are supported: {}",
                        literal
                    )));
                }
                let value = literal.parse::<i64>().map_err(|_| {
                    ExprError::Grammar(format!("Integer literal out of range: {}", literal))
                })?;
                lexemes.push(Lexeme::Int(value));
            }
            _ => {
                chars.next();
                let next = chars.peek().map(|&(_, c)| c);
                let lexeme = match (c, next) {
                    ('<', Some('=')) => Some(Lexeme::Le),
                    ('>', Some('=')) => Some(Lexeme::Ge),
                    ('=', Some('=')) => Some(Lexeme::EqEq),
                    ('!', Some('=')) => Some(Lexeme::Ne),
                    _ => None,
                };
                if let Some(lexeme) = lexeme {
                    chars.next();
                    lexemes.push(lexeme);
                    continue;
                }
                let lexeme = match c {
                    '<' => Lexeme::Lt,
                    '>' => Lexeme::Gt,
                    '+' => Lexeme::Plus,
                    '-' => Lexeme::Minus,
                    '*' => Lexeme::Star,
                    '/' => Lexeme::Slash,
                    '%' => Lexeme::Percent,
                    '(' => Lexeme::LParen,
                    ')' => Lexeme::RParen,
                    ',' => Lexeme::Comma,
                    other => {
                        return Err(ExprError::Grammar(format!(
                            "Unexpected character '{}' at offset {}",
                            other, start
                        )))
                    }
                };
                lexemes.push(lexeme);
            }
        }
    }

    Ok(lexemes)
}

fn keyword_or_name(word: &str) -> Lexeme {
    match word {
        "OR" => Lexeme::Or,
        "AND" => Lexeme::And,
        "NOT" => Lexeme::Not,
        "HAS" => Lexeme::Has,
        "IN" => Lexeme::In,
        "IS" => Lexeme::Is,
        _ => Lexeme::Name(word.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lexeme = self.lexemes.get(self.pos).cloned();
        self.pos += 1;
        lexeme
    }

    fn eat(&mut self, expected: &Lexeme) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Lexeme) -> ExprResult<()> {
        if self.eat(expected) {
            return Ok(());
        }
        Err(ExprError::Grammar(match self.peek() {
            Some(found) => format!(
                "Expected {} but found {}",
                expected.describe(),
                found.describe()
            ),
            None => format!("Expected {} but reached end of input", expected.describe()),
        }))
    }

    fn parse_test(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&Lexeme::Or) {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_not()?;
        while self.eat(&Lexeme::And) {
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> ExprResult<Expr> {
        if self.eat(&Lexeme::Not) {
            return Ok(Expr::Not(Box::new(self.parse_not()?)));
        }
        if self.eat(&Lexeme::Has) {
            return Ok(Expr::Has(Box::new(self.parse_not()?)));
        }
        self.parse_comparison()
    }

    fn parse_compare_op(&mut self) -> ExprResult<Option<CompareOp>> {
        let op = match self.peek() {
            Some(Lexeme::Lt) => CompareOp::Lt,
            Some(Lexeme::Gt) => CompareOp::Gt,
            Some(Lexeme::EqEq) => CompareOp::Eq,
            Some(Lexeme::Ge) => CompareOp::Ge,
            Some(Lexeme::Le) => CompareOp::Le,
            Some(Lexeme::Ne) => CompareOp::Ne,
            Some(Lexeme::In) => CompareOp::In,
            Some(Lexeme::Not) => {
                self.pos += 1;
                self.expect(&Lexeme::In)?;
                return Ok(Some(CompareOp::NotIn));
            }
            Some(Lexeme::Is) => {
                self.pos += 1;
                if self.eat(&Lexeme::Not) {
                    return Ok(Some(CompareOp::IsNot));
                }
                return Ok(Some(CompareOp::Is));
            }
            _ => return Ok(None),
        };
        self.pos += 1;
        Ok(Some(op))
    }

    fn parse_comparison(&mut self) -> ExprResult<Expr> {
        let left = self.parse_arith()?;
        let Some(op) = self.parse_compare_op()? else {
            return Ok(left);
        };
        let right = self.parse_arith()?;

        if self.parse_compare_op()?.is_some() {
            return Err(ExprError::Grammar(
                "Chained comparisons are not supported; combine them with AND".to_string(),
            ));
        }

        Ok(Expr::Compare(op, Box::new(left), Box::new(right)))
    }

    fn parse_arith(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Lexeme::Plus) => ArithOp::Add,
                Some(Lexeme::Minus) => ArithOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_term()?;
            left = Expr::Arith(op, Box::new(left), Box::new(right));
        }
    }

    fn parse_term(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Some(Lexeme::Star) => ArithOp::Mul,
                Some(Lexeme::Slash) => ArithOp::Div,
                Some(Lexeme::Percent) => ArithOp::Rem,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_factor()?;
            left = Expr::Arith(op, Box::new(left), Box::new(right));
        }
    }

    fn parse_factor(&mut self) -> ExprResult<Expr> {
        if self.eat(&Lexeme::Minus) {
            return Ok(Expr::Neg(Box::new(self.parse_factor()?)));
        }
        if self.eat(&Lexeme::Plus) {
            return Ok(Expr::Pos(Box::new(self.parse_factor()?)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> ExprResult<Expr> {
        match self.bump() {
            Some(Lexeme::Name(name)) => {
                if !self.eat(&Lexeme::LParen) {
                    return Ok(Expr::Name(name));
                }
                let function = InlineFunction::from_directive(&name)
                    .ok_or_else(|| ExprError::Grammar(format!("Unknown function {}", name)))?;
                let argument = self.parse_test()?;
                if self.peek() == Some(&Lexeme::Comma) {
                    return Err(ExprError::Grammar(format!(
                        "{} takes exactly one argument",
                        name
                    )));
                }
                self.expect(&Lexeme::RParen)?;
                Ok(Expr::Call(function, Box::new(argument)))
            }
            Some(Lexeme::Int(value)) => Ok(Expr::Int(value)),
            Some(Lexeme::LParen) => {
                let inner = self.parse_test()?;
                self.expect(&Lexeme::RParen)?;
                Ok(inner)
            }
            Some(other) => Err(ExprError::Grammar(format!(
                "Unexpected {}",
                other.describe()
            ))),
            None => Err(ExprError::Grammar(
                "Unexpected end of expression".to_string(),
            )),
        }
    }
}

impl Expr {
    /// Parse a complete condition
    pub(crate) fn parse(source: &str) -> ExprResult<Expr> {
        let lexemes = lex(source)?;
        if lexemes.is_empty() {
            return Err(ExprError::Grammar("Empty expression".to_string()));
        }

        let mut parser = Parser { lexemes, pos: 0 };
        let expr = parser.parse_test()?;

        if let Some(extra) = parser.peek() {
            return Err(ExprError::Grammar(format!(
                "Unexpected {} after end of expression",
                extra.describe()
            )));
        }
        Ok(expr)
    }

    /// Evaluate against an environment
    pub(crate) fn evaluate(&self, env: &dyn Environment) -> ExprResult<Value> {
        match self {
            Expr::Name(name) => Ok(env.resolve(name)),
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Or(left, right) => {
                let left = left.evaluate(env)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    right.evaluate(env)
                }
            }
            Expr::And(left, right) => {
                let left = left.evaluate(env)?;
                if left.is_truthy() {
                    right.evaluate(env)
                } else {
                    Ok(left)
                }
            }
            Expr::Not(inner) => Ok(Value::Bool(!inner.evaluate(env)?.is_truthy())),
            Expr::Has(inner) => Ok(Value::Bool(!inner.evaluate(env)?.is_missing())),
            Expr::Compare(op, left, right) => {
                compare(*op, &left.evaluate(env)?, &right.evaluate(env)?).map(Value::Bool)
            }
            Expr::Arith(op, left, right) => arith(*op, &left.evaluate(env)?, &right.evaluate(env)?),
            Expr::Neg(inner) => match inner.evaluate(env)?.as_number() {
                Some(Number::Int(i)) => i
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| ExprError::Evaluation("Integer overflow in negation".to_string())),
                Some(Number::Float(f)) => Ok(Value::Float(-f)),
                None => Err(ExprError::Evaluation(
                    "Unary '-' needs a number".to_string(),
                )),
            },
            Expr::Pos(inner) => match inner.evaluate(env)?.as_number() {
                Some(Number::Int(i)) => Ok(Value::Int(i)),
                Some(Number::Float(f)) => Ok(Value::Float(f)),
                None => Err(ExprError::Evaluation(
                    "Unary '+' needs a number".to_string(),
                )),
            },
            Expr::Call(function, argument) => {
                let argument = argument.evaluate(env)?;
                env.call(*function, &argument)
            }
        }
    }
}

/// Parse and evaluate in one step
pub(crate) fn evaluate(source: &str, env: &dyn Environment) -> ExprResult<Value> {
    Expr::parse(source)?.evaluate(env)
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> ExprResult<bool> {
    match op {
        CompareOp::Eq => Ok(left.loose_eq(right)),
        CompareOp::Ne => Ok(!left.loose_eq(right)),
        CompareOp::Is => Ok(left == right),
        CompareOp::IsNot => Ok(left != right),
        CompareOp::In => contains(right, left),
        CompareOp::NotIn => contains(right, left).map(|found| !found),
        CompareOp::Lt | CompareOp::Gt | CompareOp::Le | CompareOp::Ge => {
            let ordering = order(left, right).ok_or_else(|| {
                ExprError::Evaluation(format!(
                    "Cannot order {} and {}",
                    left.type_name(),
                    right.type_name()
                ))
            })?;
            Ok(match op {
                CompareOp::Lt => ordering.is_lt(),
                CompareOp::Gt => ordering.is_gt(),
                CompareOp::Le => ordering.is_le(),
                _ => ordering.is_ge(),
            })
        }
    }
}

fn order(left: &Value, right: &Value) -> Option<std::cmp::Ordering> {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return match (a, b) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            _ => a.as_f64().partial_cmp(&b.as_f64()),
        };
    }
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn contains(container: &Value, needle: &Value) -> ExprResult<bool> {
    if let Some(elements) = container.elements() {
        return Ok(elements.iter().any(|element| element.loose_eq(needle)));
    }
    match (container, needle) {
        (Value::Str(haystack), Value::Str(needle)) => Ok(haystack.contains(needle.as_str())),
        (Value::Record(fields), Value::Str(key)) => Ok(fields.contains_key(key)),
        _ => Err(ExprError::Evaluation(format!(
            "Cannot test {} IN {}",
            needle.type_name(),
            container.type_name()
        ))),
    }
}

fn arith(op: ArithOp, left: &Value, right: &Value) -> ExprResult<Value> {
    let overflow = || ExprError::Evaluation("Integer overflow".to_string());
    let by_zero = || ExprError::Evaluation("Division by zero".to_string());

    match (op, left, right) {
        (ArithOp::Add, Value::Str(a), Value::Str(b)) => return Ok(Value::Str(format!("{}{}", a, b))),
        (ArithOp::Add, Value::List(a), Value::List(b)) => {
            return Ok(Value::List(a.iter().chain(b).cloned().collect()))
        }
        _ => {}
    }

    let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
        return Err(ExprError::Evaluation(format!(
            "Unsupported operand types for {}: {} and {}",
            op.symbol(),
            left.type_name(),
            right.type_name()
        )));
    };

    if op == ArithOp::Div {
        if b.as_f64() == 0.0 {
            return Err(by_zero());
        }
        return Ok(Value::Float(a.as_f64() / b.as_f64()));
    }

    match (a, b) {
        (Number::Int(a), Number::Int(b)) => {
            let result = match op {
                ArithOp::Add => a.checked_add(b),
                ArithOp::Sub => a.checked_sub(b),
                ArithOp::Mul => a.checked_mul(b),
                ArithOp::Rem => {
                    if b == 0 {
                        return Err(by_zero());
                    }
                    // Result takes the sign of the divisor
                    a.checked_rem(b)
                        .map(|r| if r != 0 && (r < 0) != (b < 0) { r + b } else { r })
                }
                ArithOp::Div => None,
            };
            result.map(Value::Int).ok_or_else(overflow)
        }
        (a, b) => {
            let (a, b) = (a.as_f64(), b.as_f64());
            let result = match op {
                ArithOp::Add => a + b,
                ArithOp::Sub => a - b,
                ArithOp::Mul => a * b,
                ArithOp::Rem => {
                    if b == 0.0 {
                        return Err(by_zero());
                    }
                    let r = a % b;
                    if r != 0.0 && (r < 0.0) != (b < 0.0) {
                        r + b
                    } else {
                        r
                    }
                }
                ArithOp::Div => a / b,
            };
            Ok(Value::Float(result))
        }
    }
}

impl ArithOp {
    fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Rem => "%",
        }
    }
}

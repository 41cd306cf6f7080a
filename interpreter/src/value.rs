use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::error::RuntimeError;

// Numbers keep integer and floating representations apart: integer literals
// stay integers until an operation forces them out. Promotion to floating
// point happens on mixed operands, inexact division, negative exponents and
// i64 overflow.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }

    pub(crate) fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(n) => n == 0.0,
        }
    }

    pub(crate) fn add(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_add(b) {
                Some(n) => Number::Int(n),
                None => Number::Float(a as f64 + b as f64),
            },
            _ => Number::Float(self.as_f64() + other.as_f64()),
        }
    }

    pub(crate) fn sub(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_sub(b) {
                Some(n) => Number::Int(n),
                None => Number::Float(a as f64 - b as f64),
            },
            _ => Number::Float(self.as_f64() - other.as_f64()),
        }
    }

    pub(crate) fn mul(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_mul(b) {
                Some(n) => Number::Int(n),
                None => Number::Float(a as f64 * b as f64),
            },
            _ => Number::Float(self.as_f64() * other.as_f64()),
        }
    }

    // Integer division stays integral only when it is exact, so 4 / 2 is 2
    // but 1 / 2 is 0.5.
    pub(crate) fn div(self, other: Number) -> Result<Number, RuntimeError> {
        if other.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }

        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_rem(b) {
                Some(0) => match a.checked_div(b) {
                    Some(n) => Ok(Number::Int(n)),
                    None => Ok(Number::Float(a as f64 / b as f64)),
                },
                _ => Ok(Number::Float(a as f64 / b as f64)),
            },
            _ => Ok(Number::Float(self.as_f64() / other.as_f64())),
        }
    }

    // Floor modulo: a nonzero result takes the sign of the divisor, so
    // -7 % 3 is 2 and 7 % -3 is -2.
    pub(crate) fn rem(self, other: Number) -> Result<Number, RuntimeError> {
        if other.is_zero() {
            return Err(RuntimeError::ModuloByZero);
        }

        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_rem(b) {
                Some(r) if r != 0 && (r < 0) != (b < 0) => Ok(Number::Int(r + b)),
                Some(r) => Ok(Number::Int(r)),
                None => Ok(Number::Int(0)),
            },
            _ => {
                let (a, b) = (self.as_f64(), other.as_f64());
                let r = a % b;
                if r != 0.0 && (r < 0.0) != (b < 0.0) {
                    Ok(Number::Float(r + b))
                } else {
                    Ok(Number::Float(r))
                }
            }
        }
    }

    pub(crate) fn pow(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) if b >= 0 => {
                match u32::try_from(b).ok().and_then(|exp| a.checked_pow(exp)) {
                    Some(n) => Number::Int(n),
                    None => Number::Float((a as f64).powf(b as f64)),
                }
            }
            _ => Number::Float(self.as_f64().powf(other.as_f64())),
        }
    }

    pub(crate) fn neg(self) -> Number {
        match self {
            Number::Int(n) => match n.checked_neg() {
                Some(n) => Number::Int(n),
                None => Number::Float(-(n as f64)),
            },
            Number::Float(n) => Number::Float(-n),
        }
    }
}

// Equality and ordering compare by numeric value across representations,
// so 1 = 1.0 holds.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.partial_cmp(b),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! impl_from_int_for_number {
    ( $( $t:ident )* ) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Number {
                    Number::Int(n as i64)
                }
            }
        )*
    }
}

impl_from_int_for_number!(u8 i8 u16 i16 u32 i32 u64 i64 usize isize);

impl From<f64> for Number {
    fn from(n: f64) -> Number {
        Number::Float(n)
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Number {
        Number::Float(n as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(Number),
    Str(String),
    None,
}

impl Value {
    // Zero, the empty string and the no-value unit are false, everything
    // else is true.
    pub(crate) fn truthy(&self) -> bool {
        match self {
            Value::Num(n) => !n.is_zero(),
            Value::Str(s) => !s.is_empty(),
            Value::None => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::None => write!(f, "none"),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Num(n)
    }
}

// Comparisons produce boolean-like numbers; the value model has no
// dedicated bool variant.
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Num(Number::Int(value as i64))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(String::from(value))
    }
}

macro_rules! impl_from_num_for_value {
    ( $( $t:ident )* ) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Value {
                    Value::Num(Number::from(n))
                }
            }
        )*
    }
}

impl_from_num_for_value!(u8 i8 u16 i16 u32 i32 u64 i64 usize isize f32 f64);

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

// This provides Eq for f64.
#[derive(Clone, Copy, Debug)]
pub struct JsNumber(pub f64);

impl PartialEq for JsNumber {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() {
            return other.0.is_nan();
        };
        self.0.eq(&other.0)
    }
}

impl Eq for JsNumber {}

impl Hash for JsNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if !self.0.is_nan() {
            self.0.to_bits().hash(state);
        };
    }
}

const MAX_SAFE_INTEGER: f64 = 9007199254740992.0;

impl JsNumber {
    /// Shortest source text that evaluates back to this exact value. Negative values are never
    /// produced by the parser, as the sign is a separate unary operator.
    pub fn shortest_literal(&self) -> String {
        let x = self.0;
        if x.is_nan() {
            return "NaN".to_string();
        };
        if x.is_infinite() {
            // Any exponent past the f64 range rounds to Infinity.
            return if x > 0.0 { "1e999" } else { "-1e999" }.to_string();
        };
        if x < 0.0 {
            return format!("-{}", JsNumber(-x).shortest_literal());
        };
        if x == 0.0 {
            return "0".to_string();
        };

        let (digits, exp) = decimal_digits(x);
        let plain = plain_notation(&digits, exp);
        let mut best = plain;
        if exp != 0 {
            let sci = format!("{}e{}", digits, exp);
            if sci.len() < best.len() {
                best = sci;
            };
        };
        if x.fract() == 0.0 && x <= MAX_SAFE_INTEGER {
            let hex = format!("0x{:x}", x as u64);
            if hex.len() < best.len() {
                best = hex;
            };
        };
        best
    }

    /// Whether `s` is the canonical string form of a non-negative integer small enough to be
    /// written as a number literal without changing its value, e.g. "0" or "42" but not "01".
    pub fn is_canonical_index(s: &[u8]) -> bool {
        match s {
            [] => false,
            [b'0'] => true,
            [b'0', ..] => false,
            _ => s.len() <= 15 && s.iter().all(|c| c.is_ascii_digit()),
        }
    }
}

// Splits `x` into its shortest round-tripping significant digits and the power of ten that scales
// them to `x`, so that `x == digits * 10^exp`.
fn decimal_digits(x: f64) -> (String, i32) {
    let repr = format!("{:e}", x);
    let (mantissa, exponent) = repr.split_once('e').unwrap_or((&repr, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let mut digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let scale = digits.len() as i32 - 1;
    let mut exp = exponent - scale;
    while digits.len() > 1 && digits.ends_with('0') {
        digits.pop();
        exp += 1;
    }
    (digits, exp)
}

fn plain_notation(digits: &str, exp: i32) -> String {
    let n = digits.len() as i32;
    if exp >= 0 {
        let mut out = digits.to_string();
        out.extend(std::iter::repeat('0').take(exp as usize));
        out
    } else if -exp < n {
        let split = (n + exp) as usize;
        format!("{}.{}", &digits[..split], &digits[split..])
    } else {
        let mut out = ".".to_string();
        out.extend(std::iter::repeat('0').take((-exp - n) as usize));
        out.push_str(digits);
        out
    }
}

impl Display for JsNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shortest_literal())
    }
}

#[cfg(test)]
mod tests {
    use super::JsNumber;

    fn lit(x: f64) -> String {
        JsNumber(x).shortest_literal()
    }

    #[test]
    fn test_shortest_literal() {
        assert_eq!(lit(0.0), "0");
        assert_eq!(lit(1.0), "1");
        assert_eq!(lit(0.5), ".5");
        assert_eq!(lit(0.001), ".001");
        assert_eq!(lit(0.0001), "1e-4");
        assert_eq!(lit(100.0), "100");
        assert_eq!(lit(1000.0), "1e3");
        assert_eq!(lit(12345.678), "12345.678");
        assert_eq!(lit(1.5e300), "15e299");
        assert_eq!(lit(f64::INFINITY), "1e999");
        assert_eq!(lit(0xFFFFFFFFFFFFu64 as f64), "0xffffffffffff");
    }

    #[test]
    fn test_canonical_index() {
        assert!(JsNumber::is_canonical_index(b"0"));
        assert!(JsNumber::is_canonical_index(b"42"));
        assert!(!JsNumber::is_canonical_index(b"01"));
        assert!(!JsNumber::is_canonical_index(b"1.5"));
        assert!(!JsNumber::is_canonical_index(b""));
    }
}

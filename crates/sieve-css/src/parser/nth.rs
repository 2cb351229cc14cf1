use serde::Serialize;

/// The arithmetic sequence `a·n + b` of an `nth-*` pseudo-class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Nth {
    /// Step between matching positions.
    pub a: i64,
    /// Offset of the first matching position.
    pub b: i64,
}

impl Nth {
    /// `odd`, positions 1, 3, 5, ...
    pub const ODD: Self = Self::new(2, 1);
    /// `even`, positions 2, 4, 6, ...
    pub const EVEN: Self = Self::new(2, 0);

    /// Create a sequence.
    #[must_use]
    pub const fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    /// Parse the argument text of an `nth-*` pseudo-class.
    ///
    /// Accepts `odd`, `even`, `k`, `n+k`, `-n+k`, `An+k` and `An`, with
    /// optional signs and whitespace around the operator.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let expr = raw
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        match expr.as_str() {
            "" => None,
            "odd" => Some(Self::ODD),
            "even" => Some(Self::EVEN),
            other if other.contains('n') => parse_expression(other),
            other => parse_signed(other).map(|b| Self::new(0, b)),
        }
    }

    /// Whether the 1-based `position` is in the sequence.
    #[must_use]
    pub const fn matches(self, position: i64) -> bool {
        let Self { a, b } = self;
        if a == 0 {
            return position == b;
        }
        let distance = if a > 0 {
            position.checked_sub(b)
        } else {
            b.checked_sub(position)
        };
        match distance {
            Some(distance) if distance >= 0 => distance % a == 0,
            _ => false,
        }
    }
}

/// `An+B` with the `n` already known to be present.
fn parse_expression(expr: &str) -> Option<Nth> {
    let (a_part, b_part) = expr.split_once('n')?;

    let a = match a_part {
        "" | "+" => 1,
        "-" => -1,
        _ => parse_signed(a_part)?,
    };

    if b_part.is_empty() {
        return Some(Nth::new(a, 0));
    }

    // The offset always carries an explicit sign: `n+1`, `2n-3`.
    let b = match b_part.as_bytes().first() {
        Some(b'+' | b'-') => parse_signed(b_part)?,
        _ => return None,
    };
    Some(Nth::new(a, b))
}

/// An integer with an optional leading sign, digits only.
fn parse_signed(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

//! Quantification ranges.

/// A `{min,max}` range; `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub min: u32,
    pub max: Option<u32>,
}

impl Boundary {
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Parse a quantifier literal into a boundary.
    ///
    /// - `*` → (0, unbounded), `+` → (1, unbounded), `?` → (0, 1)
    /// - `{m,n}` → (m, n), `{m,}` → (m, unbounded), `{,n}` → (0, n)
    /// - `{n}` → (n, n)
    ///
    /// Returns `None` for anything else.
    pub fn from_quantifier(text: &str) -> Option<Self> {
        match text {
            "*" => return Some(Self::new(0, None)),
            "+" => return Some(Self::new(1, None)),
            "?" => return Some(Self::new(0, Some(1))),
            _ => {}
        }

        let inner = text.strip_prefix('{')?.strip_suffix('}')?;
        match inner.split_once(',') {
            None => {
                let n: u32 = inner.trim().parse().ok()?;
                Some(Self::new(n, Some(n)))
            }
            Some((lo, hi)) => {
                let min = match lo.trim() {
                    "" => 0,
                    s => s.parse().ok()?,
                };
                let max = match hi.trim() {
                    "" => None,
                    s => Some(s.parse().ok()?),
                };
                Some(Self::new(min, max))
            }
        }
    }
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) => write!(f, "{{{},{}}}", self.min, max),
            None => write!(f, "{{{},}}", self.min),
        }
    }
}

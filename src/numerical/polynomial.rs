use std::fmt;

/// coefficients smaller than this are not printed
pub const PRINT_THRESHOLD: f64 = 1e-12;

/// Dense polynomial of one real variable, coefficients ascending by degree:
/// `coefficients[k]` multiplies x^k.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(c: f64) -> Self {
        Self::new(vec![c])
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Horner's scheme
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + c)
    }

    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let n = self.coefficients.len().max(other.coefficients.len());
        let coefficients = (0..n)
            .map(|k| {
                self.coefficients.get(k).copied().unwrap_or(0.0)
                    + other.coefficients.get(k).copied().unwrap_or(0.0)
            })
            .collect();
        Polynomial::new(coefficients)
    }

    pub fn scale(&self, factor: f64) -> Polynomial {
        Polynomial::new(self.coefficients.iter().map(|c| c * factor).collect())
    }

    /// p(x) * (x - root)
    pub fn mul_linear(&self, root: f64) -> Polynomial {
        let mut coefficients = vec![0.0; self.coefficients.len() + 1];
        for (k, c) in self.coefficients.iter().enumerate() {
            coefficients[k + 1] += c;
            coefficients[k] -= c * root;
        }
        Polynomial::new(coefficients)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let terms: Vec<(f64, String)> = self
            .coefficients
            .iter()
            .enumerate()
            .rev()
            .map(|(k, c)| (*c, power_of("x", k)))
            .collect();
        write!(f, "{}", format_sum(&terms))
    }
}

/// `base^k` with the trivial powers simplified
pub fn power_of(base: &str, k: usize) -> String {
    match k {
        0 => String::new(),
        1 => base.to_string(),
        _ => format!("{}^{}", base, k),
    }
}

/// Text of the factor (x - shift): `x`, `(x - 2)` or `(x + 0.5)`.
pub fn shifted_variable(shift: f64) -> String {
    if shift.abs() < PRINT_THRESHOLD {
        "x".to_string()
    } else if shift > 0.0 {
        format!("(x - {})", format_coefficient(shift))
    } else {
        format!("(x + {})", format_coefficient(-shift))
    }
}

/// Up to six decimals without trailing zeros, scientific notation for extreme magnitudes.
pub fn format_coefficient(c: f64) -> String {
    let magnitude = c.abs();
    if magnitude != 0.0 && !(1e-4..1e9).contains(&magnitude) {
        return format!("{:.6e}", c);
    }
    let text = format!("{:.6}", c);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Joins `coefficient*monomial` terms with signs, skipping negligible coefficients.
/// An empty monomial marks the constant term. Prints `0` when nothing is left.
pub fn format_sum(terms: &[(f64, String)]) -> String {
    let mut out = String::new();
    for (c, monomial) in terms {
        if c.abs() < PRINT_THRESHOLD {
            continue;
        }
        let magnitude = c.abs();
        let body = if monomial.is_empty() {
            format_coefficient(magnitude)
        } else if (magnitude - 1.0).abs() < PRINT_THRESHOLD {
            monomial.clone()
        } else {
            format!("{}*{}", format_coefficient(magnitude), monomial)
        };
        match (out.is_empty(), *c < 0.0) {
            (true, false) => out.push_str(&body),
            (true, true) => {
                out.push('-');
                out.push_str(&body);
            }
            (false, false) => {
                out.push_str(" + ");
                out.push_str(&body);
            }
            (false, true) => {
                out.push_str(" - ");
                out.push_str(&body);
            }
        }
    }
    if out.is_empty() { "0".to_string() } else { out }
}

//! Human-readable byte counts in binary (1024-based) units.

use std::fmt;

/// Default number of decimal digits shown by [`HumanizedBytes`].
pub const DEFAULT_PRECISION: usize = 2;

const KIB: f64 = 1024.0;

/// `(lower, upper, scale, unit)` brackets. A value belongs to a bracket
/// when `lower <= |value| < upper`.
const SCALES: [(f64, f64, f64, &str); 9] = [
    (0.0, KIB, 1.0, "B"),
    (KIB, pow(2), KIB, "KB"),
    (pow(2), pow(3), pow(2), "MB"),
    (pow(3), pow(4), pow(3), "GB"),
    (pow(4), pow(5), pow(4), "TB"),
    (pow(5), pow(6), pow(5), "PB"),
    (pow(6), pow(7), pow(6), "EB"),
    (pow(7), pow(8), pow(7), "ZB"),
    (pow(8), pow(9), pow(8), "YB"),
];

/// Scale used past the last bracket.
const DEFAULT_SCALE: (f64, &str) = (pow(3), "GB");

const fn pow(exp: u32) -> f64 {
    let mut value = 1.0;
    let mut i = 0;
    while i < exp {
        value *= KIB;
        i += 1;
    }
    value
}

/// Scale a byte count to the largest unit whose bracket contains its
/// magnitude. Negative values keep their sign.
///
/// Values of 1024^9 and beyond (and NaN) have no unit of their own and are
/// expressed in GB.
pub fn humanize_bytes(size: f64) -> (f64, &'static str) {
    let magnitude = size.abs();
    let (scale, unit) = SCALES
        .iter()
        .find(|(lower, upper, _, _)| *lower <= magnitude && magnitude < *upper)
        .map_or(DEFAULT_SCALE, |&(_, _, scale, unit)| (scale, unit));
    (size / scale, unit)
}

/// A byte count together with its scaled form and display precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumanizedBytes {
    raw: f64,
    scaled: f64,
    unit: &'static str,
    precision: usize,
}

impl HumanizedBytes {
    pub fn new(raw: f64) -> Self {
        Self::with_precision(raw, DEFAULT_PRECISION)
    }

    pub fn with_precision(raw: f64, precision: usize) -> Self {
        let (scaled, unit) = humanize_bytes(raw);
        Self {
            raw,
            scaled,
            unit,
            precision,
        }
    }

    /// The value this was built from.
    pub fn raw(&self) -> f64 {
        self.raw
    }

    /// The value in [`unit`](Self::unit)s.
    pub fn scaled(&self) -> f64 {
        self.scaled
    }

    pub fn unit(&self) -> &'static str {
        self.unit
    }

    pub fn precision(&self) -> usize {
        self.precision
    }
}

impl From<f64> for HumanizedBytes {
    fn from(raw: f64) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for HumanizedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*} {}", self.precision, self.scaled, self.unit)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

    #[test]
    fn small_counts_stay_in_bytes() {
        assert_eq!(humanize_bytes(0.0), (0.0, "B"));
        assert_eq!(humanize_bytes(4.0), (4.0, "B"));
        assert_eq!(humanize_bytes(1023.0), (1023.0, "B"));
    }

    #[test]
    fn each_bracket_picks_its_unit() {
        for (k, unit) in UNITS.iter().enumerate().skip(1) {
            let exp = u32::try_from(k).expect("small exponent");
            let value = 4.0 * pow(exp);
            assert_eq!(humanize_bytes(value), (4.0, *unit), "bracket {k}");
            assert_eq!(humanize_bytes(pow(exp)), (1.0, *unit), "lower edge {k}");
        }
    }

    #[test]
    fn negative_values_keep_sign() {
        for (k, unit) in UNITS.iter().enumerate() {
            let exp = u32::try_from(k).expect("small exponent");
            let value = -4.0 * pow(exp);
            assert_eq!(humanize_bytes(value), (-4.0, *unit), "bracket {k}");
        }
    }

    #[test]
    fn past_yotta_falls_back_to_gigabytes() {
        let lotta = 4.0 * pow(9);
        assert_eq!(humanize_bytes(lotta), (lotta / pow(3), "GB"));
        assert_eq!(humanize_bytes(-lotta), (-lotta / pow(3), "GB"));
        assert_eq!(humanize_bytes(pow(9)).1, "GB");
    }

    #[test]
    fn humanized_bytes_exposes_parts() {
        let hb = HumanizedBytes::new(4.0 * pow(4));
        assert_eq!(hb.raw(), 4.0 * pow(4));
        assert_eq!(hb.scaled(), 4.0);
        assert_eq!(hb.unit(), "TB");
        assert_eq!(hb.precision(), DEFAULT_PRECISION);
        assert_eq!(hb.to_string(), "4.00 TB");
    }

    #[test]
    fn display_rounds_to_precision() {
        assert_eq!(HumanizedBytes::new(1536.0).to_string(), "1.50 KB");
        assert_eq!(HumanizedBytes::with_precision(1_000_000.0, 1).to_string(), "976.6 KB");
        assert_eq!(HumanizedBytes::with_precision(12.0, 0).to_string(), "12 B");
        assert_eq!(HumanizedBytes::from(-2048.0).to_string(), "-2.00 KB");
    }
}

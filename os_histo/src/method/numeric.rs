//! Fixed-width numeric ranges

use crate::error::{HistoError, HistoResult};
use crate::key::BinKey;
use os_filter::op::literal::fractional_digits;
use os_filter::record::{format_number, is_empty_value};
use serde_json::Value;

pub const DEFAULT_WIDTH: f64 = 10.0;
pub const DEFAULT_OFFSET: f64 = 0.0;

/// Quotients this close to an integer are treated as that integer
const QUOTIENT_EPSILON: f64 = 1e-9;

/// Buckets `[offset + n * width, offset + (n + 1) * width)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBins {
    width: f64,
    offset: f64,
}

impl Default for NumericBins {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl NumericBins {
    pub fn new(width: f64, offset: f64) -> HistoResult<Self> {
        let mut bins = Self::default();
        bins.set_width(width)?;
        bins.set_offset(offset)?;
        Ok(bins)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) -> HistoResult<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(HistoError::InvalidWidth { width });
        }
        self.width = width;
        Ok(())
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f64) -> HistoResult<()> {
        if !offset.is_finite() {
            return Err(HistoError::InvalidOffset { offset });
        }
        self.offset = offset;
        Ok(())
    }

    /// Decimal places printed for bounds, taken from the text of width and offset
    pub fn precision(&self) -> usize {
        fractional_digits(&format_number(self.width))
            .max(fractional_digits(&format_number(self.offset)))
    }

    /// Start of the bucket holding `value`
    pub fn bucket_start(&self, value: f64) -> f64 {
        let mut quotient = (value - self.offset) / self.width;
        if (quotient - quotient.round()).abs() < QUOTIENT_EPSILON {
            quotient = quotient.round();
        }
        let start = quotient.floor() * self.width + self.offset;
        round_to(start, self.precision())
    }

    pub fn bucket_end(&self, start: f64) -> f64 {
        round_to(start + self.width, self.precision())
    }

    pub fn key(&self, value: Option<&Value>) -> BinKey {
        match sample(value) {
            Sample::Missing => BinKey::Empty,
            Sample::Invalid => BinKey::Invalid,
            Sample::Number(n) => BinKey::Number(self.bucket_start(n)),
        }
    }

    pub fn label(&self, value: Option<&Value>) -> String {
        match self.key(value) {
            BinKey::Number(start) => self.range_label(start),
            other => other.to_string(),
        }
    }

    /// `"<start> to <end>"` for the bucket starting at `start`
    pub fn range_label(&self, start: f64) -> String {
        let (low, high) = self.range_literals(start);
        format!("{} to {}", low, high)
    }

    /// Bucket bounds printed with the configured precision
    pub fn range_literals(&self, start: f64) -> (String, String) {
        let precision = self.precision();
        (
            format_fixed(start, precision),
            format_fixed(self.bucket_end(start), precision),
        )
    }
}

enum Sample {
    Missing,
    Invalid,
    Number(f64),
}

fn sample(value: Option<&Value>) -> Sample {
    if is_empty_value(value) {
        return Sample::Missing;
    }

    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Sample::Number(n),
        _ => Sample::Invalid,
    }
}

fn round_to(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor + 0.0
}

fn format_fixed(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value + 0.0)
}

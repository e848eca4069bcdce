//! Bins back to filter XML
//!
//! Each exportable bin becomes one predicate on the method's field. Several
//! predicates are wrapped in a single `<Or>`, in the order the bins were given.

use crate::bin::Bin;
use crate::key::BinKey;
use crate::method::{BinMethod, BinStrategy, DateBinType, NumericBins};
use chrono::SecondsFormat;
use os_filter::logging::codes;
use os_filter::op::{Comparison, ComparisonOp, FilterOp, IsEmpty};
use os_filter::{log_debug, log_warning};

/// `<And>` of `start <= field < end`
fn range_filter(field: &str, start: &str, end: &str) -> String {
    format!(
        "<And>{}{}</And>",
        ComparisonOp::new(Comparison::GreaterThanOrEqualTo).filter(field, start),
        ComparisonOp::new(Comparison::LessThan).filter(field, end)
    )
}

fn numeric_filter(field: &str, bins: &NumericBins, start: f64) -> String {
    let (low, high) = bins.range_literals(start);
    range_filter(field, &low, &high)
}

fn date_filter(field: &str, bin_type: DateBinType, start: f64, label: &str) -> Option<String> {
    match bin_type.bucket_range(start) {
        Some((from, to)) => Some(range_filter(
            field,
            &from.to_rfc3339_opts(SecondsFormat::Secs, true),
            &to.to_rfc3339_opts(SecondsFormat::Secs, true),
        )),
        None if bin_type.is_cyclic() => {
            log_warning!(codes::histo::BIN_NOT_EXPORTABLE, "Cyclic date bin has no filter form",
                "bin" => label, "bin_type" => bin_type);
            None
        }
        None => {
            log_warning!(codes::histo::BIN_NOT_EXPORTABLE, "Date bin range is outside the supported calendar",
                "bin" => label, "bin_type" => bin_type, "start" => start);
            None
        }
    }
}

impl BinMethod {
    /// Predicate selecting the items of one bin; `None` when the bin cannot be exported
    pub fn bin_filter<T>(&self, bin: &Bin<T>) -> Option<String> {
        let field = self.field();
        match (bin.key(), self.strategy()) {
            (BinKey::Invalid, _) => None,
            (BinKey::Empty, _) => Some(IsEmpty.filter(field, "")),
            (BinKey::Number(start), BinStrategy::Numeric(bins)) => {
                Some(numeric_filter(field, bins, *start))
            }
            (BinKey::Number(start), BinStrategy::Date(bin_type)) => {
                date_filter(field, *bin_type, *start, bin.label())
            }
            (key, _) => Some(ComparisonOp::new(Comparison::EqualTo).filter(field, &key.to_string())),
        }
    }

    /// Filter matching the items of every exportable bin
    ///
    /// Empty when no bin is exportable, the bare predicate for one bin and an
    /// `<Or>` of the predicates otherwise.
    pub fn export_as_filter<T>(&self, bins: &[Bin<T>]) -> String {
        let predicates: Vec<String> = bins.iter().filter_map(|bin| self.bin_filter(bin)).collect();

        log_debug!("Exported bins as filter",
            "field" => self.field(), "bins" => bins.len(), "predicates" => predicates.len());

        match predicates.len() {
            0 => String::new(),
            1 => predicates.concat(),
            _ => format!("<Or>{}</Or>", predicates.concat()),
        }
    }
}

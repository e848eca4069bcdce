//! `histo` subcommands

use crate::config::{BinDefaults, CliConfig};
use crate::error::{CliError, CliResult};
use crate::input::load_records;
use clap::{Args, ValueEnum};
use os_filter::action::parse_entries_str;
use os_filter::logging::codes;
use os_filter::{log_info, log_success, FilterActionEntry, ParseContext};
use os_histo::method::numeric::{DEFAULT_OFFSET, DEFAULT_WIDTH};
use os_histo::{Bin, BinMethod, BinSort, BinSummary, DateBinType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Unique,
    Numeric,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    Count,
    Key,
    Label,
}

impl From<SortKind> for BinSort {
    fn from(kind: SortKind) -> Self {
        match kind {
            SortKind::Count => BinSort::Count,
            SortKind::Key => BinSort::Key,
            SortKind::Label => BinSort::Label,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct BinArgs {
    /// JSON array of records or a GeoJSON FeatureCollection
    #[arg(short, long)]
    pub input: PathBuf,

    /// Field to bin by
    #[arg(short, long)]
    pub field: String,

    #[arg(short, long, value_enum)]
    pub method: Option<MethodKind>,

    /// Numeric bin width
    #[arg(long)]
    pub width: Option<f64>,

    /// Numeric bin offset
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<f64>,

    /// Date bin type, e.g. day, week, hour_of_day
    #[arg(long)]
    pub date_type: Option<String>,

    /// Bin each bin's items again by this field (unique values)
    #[arg(long)]
    pub then: Option<String>,

    #[arg(short, long, value_enum)]
    pub sort: Option<SortKind>,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,

    /// Print the bins as a filter instead of JSON
    #[arg(long)]
    pub export: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ActionArgs {
    /// Filter action XML file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Records to match the entries against
    #[arg(long)]
    pub features: Option<PathBuf>,

    /// Print the parsed entries as XML instead of JSON
    #[arg(long)]
    pub xml: bool,
}

impl BinArgs {
    /// Method from the flags, falling back to the config defaults
    pub fn method(&self, defaults: &BinDefaults) -> CliResult<BinMethod> {
        let kind = self.method.or(defaults.method).unwrap_or(MethodKind::Unique);
        let method = match kind {
            MethodKind::Unique => BinMethod::unique(&self.field),
            MethodKind::Numeric => BinMethod::numeric(
                &self.field,
                self.width.or(defaults.width).unwrap_or(DEFAULT_WIDTH),
                self.offset.or(defaults.offset).unwrap_or(DEFAULT_OFFSET),
            )?,
            MethodKind::Date => {
                let bin_type = match self.date_type.as_deref().or(defaults.date_type.as_deref()) {
                    Some(name) => name.parse::<DateBinType>()?,
                    None => DateBinType::default(),
                };
                BinMethod::date(&self.field, bin_type)
            }
        };
        Ok(method)
    }
}

fn sort_tree(bins: &mut [Bin<Value>], sort: BinSort, descending: bool) {
    sort.sort(bins, descending);
    for bin in bins.iter_mut() {
        if let Some(children) = bin.children_mut() {
            sort_tree(children, sort, descending);
        }
    }
}

/// Bin the input records; returns bin summaries as JSON or the exported filter
pub fn run_bin(args: &BinArgs, config: &CliConfig) -> CliResult<String> {
    let records = load_records(&args.input)?;
    let method = args.method(&config.bin)?;

    let mut bins = match &args.then {
        Some(field) => method.bin_items_nested(&records, &BinMethod::unique(field.as_str())),
        None => method.bin_items(&records),
    };

    if let Some(sort) = args.sort.or(config.bin.sort) {
        sort_tree(&mut bins, sort.into(), args.desc || config.bin.descending);
    }

    log_info!("Records binned",
        "method" => method.type_name(), "field" => method.field(), "bins" => bins.len());

    if args.export {
        let filter = method.export_as_filter(&bins);
        log_success!(codes::success::BINS_EXPORTED, "Bins exported as filter",
            "bins" => bins.len(), "bytes" => filter.len());
        return Ok(filter);
    }

    let summaries: Vec<BinSummary> = bins.iter().map(Bin::summary).collect();
    Ok(serde_json::to_string_pretty(&summaries)?)
}

#[derive(Debug, Serialize)]
struct EntrySummary {
    id: String,
    #[serde(rename = "type")]
    entry_type: String,
    title: String,
    enabled: bool,
    temporary: bool,
    filter: String,
    actions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<EntrySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched: Option<usize>,
}

fn summarize(entry: &FilterActionEntry, records: Option<&[Arc<Value>]>) -> CliResult<EntrySummary> {
    let matched = match records {
        Some(records) => Some(entry.process_items(records)?),
        None => None,
    };

    Ok(EntrySummary {
        id: entry.id().to_string(),
        entry_type: entry.entry_type().to_string(),
        title: entry.title().to_string(),
        enabled: entry.is_enabled(),
        temporary: entry.is_temporary(),
        filter: entry.filter().to_string(),
        actions: entry
            .actions()
            .iter()
            .map(|action| action.action_type().to_string())
            .collect(),
        children: entry
            .children()
            .iter()
            .map(|child| summarize(child, records))
            .collect::<CliResult<_>>()?,
        matched,
    })
}

/// Parse a filter action file and report its entries, with match counts when records are given
pub fn run_actions(args: &ActionArgs, config: &CliConfig) -> CliResult<String> {
    let text = fs::read_to_string(&args.input).map_err(|e| CliError::io(&args.input, e))?;
    let resolver = config.resolver();
    let factory = config.action_factory();
    let context = ParseContext::new(&*resolver, &factory);

    let entries = parse_entries_str(&text, &context)?;

    if args.xml {
        return Ok(os_filter::action::to_document(&entries)?.to_xml_string());
    }

    let records = match &args.features {
        Some(path) => Some(load_records(path)?),
        None => None,
    };

    let summaries = entries
        .iter()
        .map(|entry| summarize(entry, records.as_deref()))
        .collect::<CliResult<Vec<_>>>()?;

    Ok(serde_json::to_string_pretty(&summaries)?)
}

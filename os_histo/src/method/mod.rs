//! Bin methods
//!
//! A bin method reads one value from each record (a field, or a custom value
//! function) and maps it to a [`BinKey`] and a display label. The strategy is a
//! closed set: unique values, fixed-width numeric ranges, or date buckets.

pub mod date;
pub mod numeric;
pub mod unique;

pub use date::DateBinType;
pub use numeric::NumericBins;

use crate::bin::Bin;
use crate::dimension::{Dimension, KeyedDimension};
use crate::error::{HistoError, HistoResult};
use crate::key::BinKey;
use indexmap::IndexMap;
use os_filter::record::Record;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;

/// Custom accessor used instead of reading the method's field
pub type ValueFunction = Arc<dyn Fn(&dyn Record) -> Option<Value> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum BinStrategy {
    Unique,
    Numeric(NumericBins),
    Date(DateBinType),
}

impl BinStrategy {
    /// Name persisted as the method `type`
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unique => "Unique",
            Self::Numeric(_) => "Numeric",
            Self::Date(_) => "Date",
        }
    }

    /// Default strategy for a persisted type name (case-insensitive)
    pub fn from_type_name(name: &str) -> HistoResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "unique" => Ok(Self::Unique),
            "numeric" => Ok(Self::Numeric(NumericBins::default())),
            "date" => Ok(Self::Date(DateBinType::default())),
            _ => Err(HistoError::unknown_method(name)),
        }
    }
}

#[derive(Clone)]
pub struct BinMethod {
    field: String,
    value_function: Option<ValueFunction>,
    strategy: BinStrategy,
}

impl fmt::Debug for BinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinMethod")
            .field("field", &self.field)
            .field("value_function", &self.value_function.as_ref().map(|_| "<fn>"))
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl BinMethod {
    pub fn new(field: impl Into<String>, strategy: BinStrategy) -> Self {
        Self {
            field: field.into(),
            value_function: None,
            strategy,
        }
    }

    pub fn unique(field: impl Into<String>) -> Self {
        Self::new(field, BinStrategy::Unique)
    }

    pub fn numeric(field: impl Into<String>, width: f64, offset: f64) -> HistoResult<Self> {
        Ok(Self::new(
            field,
            BinStrategy::Numeric(NumericBins::new(width, offset)?),
        ))
    }

    pub fn date(field: impl Into<String>, bin_type: DateBinType) -> Self {
        Self::new(field, BinStrategy::Date(bin_type))
    }

    /// Build a method from its persisted form; `type` selects the strategy
    pub fn from_config(config: &Value) -> HistoResult<Self> {
        let type_name = config.get("type").and_then(Value::as_str).unwrap_or_default();
        let mut method = Self::new("", BinStrategy::from_type_name(type_name)?);
        method.restore(config)?;
        Ok(method)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn set_field(&mut self, field: impl Into<String>) {
        self.field = field.into();
    }

    pub fn value_function(&self) -> Option<&ValueFunction> {
        self.value_function.as_ref()
    }

    pub fn set_value_function(&mut self, value_function: Option<ValueFunction>) {
        self.value_function = value_function;
    }

    pub fn strategy(&self) -> &BinStrategy {
        &self.strategy
    }

    pub fn set_strategy(&mut self, strategy: BinStrategy) {
        self.strategy = strategy;
    }

    pub fn type_name(&self) -> &'static str {
        self.strategy.type_name()
    }

    /// The value a record is binned by; `None` when it is absent
    pub fn value(&self, record: &dyn Record) -> Option<Value> {
        match &self.value_function {
            Some(function) => function(record),
            None => record.get(&self.field),
        }
    }

    pub fn bin_key(&self, value: Option<&Value>) -> BinKey {
        match &self.strategy {
            BinStrategy::Unique => unique::unique_key(value),
            BinStrategy::Numeric(bins) => bins.key(value),
            BinStrategy::Date(bin_type) => bin_type.key(value),
        }
    }

    pub fn bin_label(&self, value: Option<&Value>) -> String {
        match &self.strategy {
            BinStrategy::Unique => unique::unique_key(value).to_string(),
            BinStrategy::Numeric(bins) => bins.label(value),
            BinStrategy::Date(bin_type) => bin_type.label(value),
        }
    }

    /// Bin key of a record's value
    pub fn item_key(&self, record: &dyn Record) -> BinKey {
        self.bin_key(self.value(record).as_ref())
    }

    /// Group items into bins, in the order each key is first seen
    pub fn bin_items<T: Record>(&self, items: &[Arc<T>]) -> Vec<Bin<T>> {
        let mut bins: IndexMap<BinKey, Bin<T>> = IndexMap::new();

        for item in items {
            let value = self.value(&**item);
            let key = self.bin_key(value.as_ref());
            bins.entry(key.clone())
                .or_insert_with(|| Bin::new(key, self.bin_label(value.as_ref())))
                .add_item(Arc::clone(item));
        }

        bins.into_values().collect()
    }

    /// Bin items, then bin each bin's items again with `secondary` as its children
    pub fn bin_items_nested<T: Record>(&self, items: &[Arc<T>], secondary: &BinMethod) -> Vec<Bin<T>> {
        let mut bins = self.bin_items(items);
        for bin in &mut bins {
            let children = secondary.bin_items(bin.items());
            bin.set_children(Some(children));
        }
        bins
    }

    /// Dimension over `items` keyed by this method
    pub fn dimension<T: Record + 'static>(&self, items: Vec<Arc<T>>) -> KeyedDimension<T> {
        let method = self.clone();
        KeyedDimension::new(items, Arc::new(move |item: &T| method.item_key(item)))
    }

    /// Restrict a dimension to the bin holding `reference`
    pub fn filter_dimension<D>(&self, dimension: &mut D, reference: &dyn Record)
    where
        D: Dimension + ?Sized,
    {
        dimension.filter_exact(&self.item_key(reference));
    }

    /// Persisted form: `type`, `field` and the strategy's parameters
    pub fn persist(&self) -> Value {
        let mut config = Map::new();
        config.insert("type".to_string(), json!(self.type_name()));
        config.insert("field".to_string(), json!(self.field));

        match &self.strategy {
            BinStrategy::Unique => {}
            BinStrategy::Numeric(bins) => {
                config.insert("width".to_string(), json!(bins.width()));
                config.insert("offset".to_string(), json!(bins.offset()));
            }
            BinStrategy::Date(bin_type) => {
                config.insert("binType".to_string(), json!(bin_type.name()));
            }
        }

        Value::Object(config)
    }

    /// Apply a persisted form
    ///
    /// `field` is applied only when it is a string, the empty string included;
    /// null or absent leaves the current field. Strategy parameters are applied
    /// only when present with the right JSON type.
    pub fn restore(&mut self, config: &Value) -> HistoResult<()> {
        if let Some(field) = config.get("field").and_then(Value::as_str) {
            self.field = field.to_string();
        }

        match &mut self.strategy {
            BinStrategy::Unique => {}
            BinStrategy::Numeric(bins) => {
                if let Some(width) = config.get("width").and_then(Value::as_f64) {
                    bins.set_width(width)?;
                }
                if let Some(offset) = config.get("offset").and_then(Value::as_f64) {
                    bins.set_offset(offset)?;
                }
            }
            BinStrategy::Date(bin_type) => {
                if let Some(name) = config.get("binType").and_then(Value::as_str) {
                    *bin_type = name.parse()?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn unique_method() -> BinMethod {
        BinMethod::unique("field")
    }

    fn key_of(method: &BinMethod, item: Value) -> BinKey {
        method.bin_key(method.value(&item).as_ref())
    }

    #[test]
    fn test_unique_keys() {
        let method = unique_method();
        assert_eq!(key_of(&method, json!({"field": "Tada!"})), "Tada!");
        assert_eq!(key_of(&method, json!({"field": 10})), "10");

        let empty = json!({});
        let value = method.value(&empty);
        assert_eq!(method.bin_key(value.as_ref()), "No field");
        assert_eq!(method.bin_label(value.as_ref()), "No field");
    }

    #[test]
    fn test_value_function() {
        let mut method = unique_method();
        method.set_value_function(Some(Arc::new(|record: &dyn Record| {
            record.get("other").map(|v| json!(format!("x{}", v)))
        })));
        assert_eq!(key_of(&method, json!({"field": 1, "other": 2})), "x2");
    }

    #[test]
    fn test_clone_shares_value_function() {
        let mut method = unique_method();
        let function: ValueFunction = Arc::new(|_: &dyn Record| Some(json!(1)));
        method.set_value_function(Some(function));

        let clone = method.clone();
        assert_eq!(clone.field(), method.field());
        assert!(Arc::ptr_eq(
            clone.value_function().unwrap(),
            method.value_function().unwrap()
        ));
    }

    #[test]
    fn test_restore_field() {
        let mut method = unique_method();

        method.restore(&json!({})).unwrap();
        assert_eq!(method.field(), "field");

        method.restore(&json!({"field": null})).unwrap();
        assert_eq!(method.field(), "field");

        method.restore(&json!({"field": ""})).unwrap();
        assert_eq!(method.field(), "");

        method.restore(&json!({"field": "x"})).unwrap();
        assert_eq!(method.field(), "x");
    }

    #[test]
    fn test_persist_and_from_config() {
        let method = BinMethod::numeric("SPEED", 2.5, 1.0).unwrap();
        let persisted = method.persist();
        assert_eq!(
            persisted,
            json!({"type": "Numeric", "field": "SPEED", "width": 2.5, "offset": 1.0})
        );

        let restored = BinMethod::from_config(&persisted).unwrap();
        assert_eq!(restored.field(), "SPEED");
        assert_eq!(restored.strategy(), method.strategy());

        let date = BinMethod::from_config(&json!({"type": "date", "field": "TIME", "binType": "week"})).unwrap();
        assert_eq!(date.strategy(), &BinStrategy::Date(DateBinType::Week));

        assert_matches!(
            BinMethod::from_config(&json!({"type": "Radial"})),
            Err(HistoError::UnknownMethod { .. })
        );
        assert_matches!(
            BinMethod::from_config(&json!({"type": "Numeric", "width": 0})),
            Err(HistoError::InvalidWidth { .. })
        );
    }

    #[test]
    fn test_bin_items_first_seen_order() {
        let method = unique_method();
        let items: Vec<Arc<Value>> = vec![
            json!({"field": "b"}),
            json!({"field": "a"}),
            json!({}),
            json!({"field": "b"}),
            json!({"field": ""}),
        ]
        .into_iter()
        .map(Arc::new)
        .collect();

        let bins = method.bin_items(&items);
        let keys: Vec<String> = bins.iter().map(|b| b.key().to_string()).collect();
        assert_eq!(keys, vec!["b", "a", "No field"]);
        assert_eq!(bins[0].count(), 2);
        assert_eq!(bins[2].count(), 2);
        assert!(Arc::ptr_eq(&bins[0].items()[1], &items[3]));
    }

    #[test]
    fn test_bin_items_nested() {
        let primary = unique_method();
        let secondary = BinMethod::numeric("n", 10.0, 0.0).unwrap();
        let items: Vec<Arc<Value>> = vec![
            json!({"field": "a", "n": 1}),
            json!({"field": "a", "n": 15}),
            json!({"field": "b", "n": 2}),
        ]
        .into_iter()
        .map(Arc::new)
        .collect();

        let bins = primary.bin_items_nested(&items, &secondary);
        let children = bins[0].children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].label(), "10 to 20");
        assert_eq!(bins[1].children().unwrap().len(), 1);
    }

    #[test]
    fn test_filter_dimension() {
        let method = unique_method();
        let items: Vec<Arc<Value>> = vec![
            json!({"field": 5}),
            json!({"field": 10}),
            json!({"field": 15}),
        ]
        .into_iter()
        .map(Arc::new)
        .collect();

        let mut dimension = method.dimension(items.clone());
        method.filter_dimension(&mut dimension, &*items[1]);

        let top = dimension.top(usize::MAX);
        assert_eq!(top.len(), 1);
        assert!(Arc::ptr_eq(&top[0], &items[1]));
    }

    fn arb_value() -> impl Strategy<Value = Option<Value>> {
        prop_oneof![
            Just(None),
            Just(Some(Value::Null)),
            Just(Some(json!(""))),
            any::<bool>().prop_map(|b| Some(json!(b))),
            any::<i64>().prop_map(|n| Some(json!(n))),
            "[a-zA-Z0-9 ]{0,8}".prop_map(|s| Some(json!(s))),
        ]
    }

    proptest! {
        #[test]
        fn prop_unique_sentinel_law(value in arb_value()) {
            let method = unique_method();
            let mut record = Map::new();
            if let Some(v) = &value {
                record.insert("field".to_string(), v.clone());
            }

            let read = method.value(&record);
            let key = method.bin_key(read.as_ref());
            let missing = matches!(&read, None | Some(Value::Null))
                || read.as_ref().and_then(Value::as_str) == Some("");

            if missing {
                prop_assert_eq!(key, BinKey::Empty);
            } else {
                let expected = os_filter::record::coerce_string(read.as_ref().unwrap());
                prop_assert_eq!(key, BinKey::Text(expected));
            }
        }
    }
}

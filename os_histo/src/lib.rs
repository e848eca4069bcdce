pub mod bin;
pub mod dimension;
pub mod error;
pub mod export;
pub mod key;
pub mod method;
pub mod sort;

// Re-export key types for library consumers
pub use bin::{Bin, BinSummary};
pub use dimension::{Dimension, KeyAccessor, KeyedDimension};
pub use error::{HistoError, HistoResult};
pub use key::{BinKey, EMPTY_LABEL, INVALID_LABEL};
pub use method::{BinMethod, BinStrategy, DateBinType, NumericBins, ValueFunction};
pub use sort::{
    sort_by_count, sort_by_count_desc, sort_by_key, sort_by_key_desc, sort_by_label,
    sort_by_label_desc, BinComparator, BinSort,
};

pub mod prelude {
    pub use crate::bin::Bin;
    pub use crate::dimension::Dimension;
    pub use crate::key::BinKey;
    pub use crate::method::{BinMethod, BinStrategy, DateBinType};
    pub use crate::sort::BinSort;
}

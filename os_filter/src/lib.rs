// Internal modules
#[macro_use]
pub mod logging;
pub mod action;
pub mod config;
pub mod expression;
pub mod op;
pub mod record;
pub mod xml;

// Re-export key types for library consumers
pub use action::{
    ActionFactory, FilterAction, FilterActionEntry, IdentityTypeResolver, ParseContext,
    StaticTypeResolver, TypeResolver, XmlAction, XmlActionFactory,
};
pub use expression::{ExpressionError, FilterExpression, FilterNode};
pub use op::{FilterOp, OpRegistry};
pub use record::Record;
pub use xml::{XmlElement, XmlError};

pub mod prelude {
    pub use crate::action::{parse_document, parse_entry, FilterAction, FilterActionEntry, ParseContext};
    pub use crate::expression::FilterExpression;
    pub use crate::op::{
        Between, Comparison, ComparisonOp, FilterOp, InList, IsEmpty, IsLike, IsLikeNumeric,
        IsNull, Not, OpRegistry,
    };
    pub use crate::record::Record;
}

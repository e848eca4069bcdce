pub mod filter {
    /// Wildcard character written on `PropertyIsLike` and accepted in like literals
    pub const WILDCARD: char = '*';

    /// Single character match written on `PropertyIsLike`
    pub const SINGLE_CHAR: char = '.';

    /// Escape character written on `PropertyIsLike`
    pub const ESCAPE_CHAR: char = '\\';

    /// Separator for list literals ("a, b, c") and between bounds
    pub const LIST_SEPARATOR: char = ',';

    /// Attribute carrying an op's match hint
    pub const HINT_ATTRIBUTE: &str = "hint";

    /// Namespace prefix removed from stored filters
    pub const OGC_PREFIX: &str = "ogc:";

    /// Maximum nesting of And/Or/Not groups accepted when compiling a filter
    /// SECURITY: bounds recursion on imported documents
    pub const MAX_FILTER_DEPTH: usize = 64;
}

pub mod xml {
    /// Maximum element nesting accepted when reading a document
    /// SECURITY: the element tree is walked recursively after parsing
    pub const MAX_ELEMENT_DEPTH: usize = 256;
}

pub mod column_types {
    pub const STRING: &str = "string";
    pub const INTEGER: &str = "integer";
    pub const DECIMAL: &str = "decimal";
    pub const BOOLEAN: &str = "boolean";
    pub const DATETIME: &str = "datetime";

    pub const ALL: &[&str] = &[STRING, INTEGER, DECIMAL, BOOLEAN, DATETIME];
    pub const NUMERIC: &[&str] = &[INTEGER, DECIMAL];
    pub const TEXT: &[&str] = &[STRING];
}

pub mod action {
    /// Element name written for a serialized filter action entry
    pub const ENTRY_TAG: &str = "filterAction";

    /// Root element written around a list of entries
    pub const ROOT_TAG: &str = "filterActions";

    pub const FILTER_TAG: &str = "filter";
    pub const ACTIONS_TAG: &str = "actions";

    /// `typeHint` value that pins an entry to its literal type
    pub const TYPE_HINT_EXACT: &str = "exact";

    /// Separator between a state id and the scoped id or type
    pub const STATE_SCOPE_SEPARATOR: &str = "_";
}

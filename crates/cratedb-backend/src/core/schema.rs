//! Table and column descriptors.
//!
//! These types are the adapter's view of the host ORM's model registry. A
//! descriptor is constructed once at registration time, is immutable after,
//! and is consumed repeatedly by the DDL synthesizer.
//!
//! Abstract column kinds are a tagged enum ([`ColumnType`]) rather than a
//! class hierarchy: rendering dispatches on the tag, and kind-specific
//! attributes (length, precision, element type, object policy) live on the
//! variant itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::expr::Expr;

/// Three-state optional for per-table CrateDB options.
///
/// `Omitted` means the user never mentioned the option, `Empty` means the
/// user explicitly set it to nothing, and `Value` carries a real setting.
/// The distinction matters at DDL-generation time: an omitted option is
/// silently skipped, an explicitly-empty one is a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaOption<T> {
    /// The option never appeared in the table declaration.
    Omitted,
    /// The option was declared but given no value.
    Empty,
    /// The option was declared with a value.
    Value(T),
}

impl<T> Default for MetaOption<T> {
    fn default() -> Self {
        MetaOption::Omitted
    }
}

impl<T> MetaOption<T> {
    /// Whether the option never appeared.
    pub fn is_omitted(&self) -> bool {
        matches!(self, MetaOption::Omitted)
    }

    /// The declared value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            MetaOption::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Column policy for `OBJECT` columns.
///
/// Controls how CrateDB treats object keys that are not part of the declared
/// sub-schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectPolicy {
    /// New keys are accepted and indexed.
    #[default]
    Dynamic,
    /// Only declared keys are accepted.
    Strict,
    /// New keys are accepted but not indexed.
    Ignored,
}

impl ObjectPolicy {
    /// The keyword as it appears in `OBJECT(<policy>)`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectPolicy::Dynamic => "dynamic",
            ObjectPolicy::Strict => "strict",
            ObjectPolicy::Ignored => "ignored",
        }
    }
}

impl fmt::Display for ObjectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract column kind with its kind-specific attributes.
///
/// Scalar kinds resolve through the static type table
/// ([`crate::typemap::scalar_type`]); `Array` and `Object` are resolved
/// recursively by the DDL synthesizer because CrateDB's array and object
/// syntax nests arbitrarily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Auto-incrementing integer primary key. CrateDB has no sequences, so
    /// this renders as a random-integer default expression.
    Auto,
    /// 64-bit variant of [`ColumnType::Auto`].
    BigAuto,
    /// 16-bit variant of [`ColumnType::Auto`].
    SmallAuto,
    /// Binary data.
    Binary,
    /// Boolean.
    Boolean,
    /// Variable-length text with an optional declared maximum.
    Char { max_length: Option<u32> },
    /// Calendar date (stored as timestamp with time zone).
    Date,
    /// Timestamp with time zone.
    DateTime,
    /// Fixed-precision decimal.
    Decimal { max_digits: u32, decimal_places: u32 },
    /// Time interval.
    Duration,
    /// 64-bit floating point.
    Float,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInteger,
    /// 16-bit integer.
    SmallInteger,
    /// CrateDB native IP type.
    Ip,
    /// Generic IP address (inet).
    Inet,
    /// Unbounded text.
    Text,
    /// Time of day.
    Time,
    /// UUID, stored as its 36-character text form.
    Uuid,
    /// Array of an element type, nesting without bound.
    Array(Box<ColumnType>),
    /// Nested object with a column policy and an optional inline sub-schema.
    Object {
        policy: ObjectPolicy,
        /// Declared sub-fields; empty means no `AS (...)` clause.
        object_schema: Vec<(String, ColumnType)>,
    },
}

impl ColumnType {
    /// Array of the given element type.
    pub fn array(element: ColumnType) -> Self {
        ColumnType::Array(Box::new(element))
    }

    /// Dynamic object with no declared sub-schema.
    pub fn object() -> Self {
        ColumnType::Object {
            policy: ObjectPolicy::Dynamic,
            object_schema: Vec::new(),
        }
    }

    /// Object with an explicit policy and no declared sub-schema.
    pub fn object_with_policy(policy: ObjectPolicy) -> Self {
        ColumnType::Object {
            policy,
            object_schema: Vec::new(),
        }
    }

    /// Object with an explicit policy and an inline sub-schema.
    pub fn object_with_schema<I, N>(policy: ObjectPolicy, schema: I) -> Self
    where
        I: IntoIterator<Item = (N, ColumnType)>,
        N: Into<String>,
    {
        ColumnType::Object {
            policy,
            object_schema: schema.into_iter().map(|(n, t)| (n.into(), t)).collect(),
        }
    }

    /// Varchar with a declared maximum length.
    pub fn varchar(max_length: u32) -> Self {
        ColumnType::Char {
            max_length: Some(max_length),
        }
    }
}

/// Generated (computed) column declaration.
///
/// CrateDB recomputes generated values at read time and cannot store them
/// physically, so a requested `db_persist` is always forced off at DDL
/// generation (with a warning).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSpec {
    /// The generation expression.
    pub expression: Expr,
    /// Caller-requested persistence. Never honored.
    pub db_persist: bool,
}

impl GeneratedSpec {
    /// Generated column computed from the given expression.
    pub fn new(expression: Expr) -> Self {
        Self {
            expression,
            db_persist: false,
        }
    }

    /// Request physical persistence. CrateDB ignores this; the request is
    /// kept only so the synthesizer can warn about it.
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.db_persist = persist;
        self
    }
}

/// Column descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Abstract column kind.
    pub ty: ColumnType,

    /// Whether the column allows NULL.
    pub null: bool,

    /// Advisory uniqueness flag. CrateDB cannot enforce uniqueness; the
    /// flag is dropped with a warning at DDL generation.
    pub unique: bool,

    /// Whether the column is indexed. CrateDB indexes every column by
    /// default; `false` renders an explicit `INDEX OFF`.
    pub db_index: bool,

    /// Whether the column is the (single-column) primary key.
    pub primary_key: bool,

    /// Database-side default expression.
    pub db_default: Option<Expr>,

    /// Generated-column declaration.
    pub generated: Option<GeneratedSpec>,
}

impl Column {
    /// A non-null, indexed, non-unique column of the given kind.
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            null: false,
            unique: false,
            db_index: true,
            primary_key: false,
            db_default: None,
            generated: None,
        }
    }

    /// Allow NULL values.
    pub fn null(mut self) -> Self {
        self.null = true;
        self
    }

    /// Declare the column unique (advisory only).
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Disable indexing for this column.
    pub fn no_index(mut self) -> Self {
        self.db_index = false;
        self
    }

    /// Mark as the single-column primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Set a database-side default expression.
    pub fn db_default(mut self, expr: Expr) -> Self {
        self.db_default = Some(expr);
        self
    }

    /// Declare the column as generated.
    pub fn generated(mut self, spec: GeneratedSpec) -> Self {
        self.generated = Some(spec);
        self
    }
}

/// Partition-by declaration. A bare column name is treated as a
/// single-column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionBy {
    /// A single partition column.
    Column(String),
    /// An ordered list of partition columns.
    Columns(Vec<String>),
}

impl PartitionBy {
    /// Normalized column list.
    pub fn columns(&self) -> Vec<String> {
        match self {
            PartitionBy::Column(name) => vec![name.clone()],
            PartitionBy::Columns(names) => names.clone(),
        }
    }
}

impl From<&str> for PartitionBy {
    fn from(name: &str) -> Self {
        PartitionBy::Column(name.to_string())
    }
}

impl From<String> for PartitionBy {
    fn from(name: String) -> Self {
        PartitionBy::Column(name)
    }
}

impl From<Vec<String>> for PartitionBy {
    fn from(names: Vec<String>) -> Self {
        PartitionBy::Columns(names)
    }
}

impl From<Vec<&str>> for PartitionBy {
    fn from(names: Vec<&str>) -> Self {
        PartitionBy::Columns(names.into_iter().map(str::to_string).collect())
    }
}

/// CrateDB-specific per-table options.
///
/// The partition, clustering and shard options are validated when DDL is
/// generated, not when the table is declared, so the full column list is
/// known at validation time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableOptions {
    /// Issue a `REFRESH TABLE` after every successful row-level write so
    /// the write becomes visible to subsequent reads.
    pub auto_refresh: bool,

    /// `PARTITIONED BY (...)` columns.
    pub partition_by: MetaOption<PartitionBy>,

    /// `CLUSTERED BY (col)` column.
    pub clustered_by: MetaOption<String>,

    /// `CLUSTERED ... INTO n shards` count. Must be strictly positive.
    pub number_of_shards: MetaOption<i64>,
}

impl TableOptions {
    /// Options with every CrateDB extension omitted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable refresh-after-write for the table.
    pub fn auto_refresh(mut self) -> Self {
        self.auto_refresh = true;
        self
    }

    /// Declare partition columns.
    pub fn partition_by(mut self, partition: impl Into<PartitionBy>) -> Self {
        self.partition_by = MetaOption::Value(partition.into());
        self
    }

    /// Declare the clustering column.
    pub fn clustered_by(mut self, column: impl Into<String>) -> Self {
        self.clustered_by = MetaOption::Value(column.into());
        self
    }

    /// Declare the shard count.
    pub fn number_of_shards(mut self, shards: i64) -> Self {
        self.number_of_shards = MetaOption::Value(shards);
        self
    }
}

/// Table descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Column definitions, in declaration order.
    pub columns: Vec<Column>,

    /// Composite primary key column names, in declared order. When
    /// non-empty, the key renders as a trailing `PRIMARY KEY (...)` clause
    /// and per-column `primary_key` flags are not rendered inline.
    pub primary_key: Vec<String>,

    /// CrateDB-specific options.
    pub options: TableOptions,
}

impl Table {
    /// An empty table descriptor with default options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            options: TableOptions::default(),
        }
    }

    /// Append a column.
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Declare a composite primary key.
    pub fn with_composite_pk<I, N>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Attach CrateDB-specific options.
    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether a column with the given name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// Index declaration coming from the host ORM's migration framework.
///
/// CrateDB indexes every column by default and supports no standalone index
/// DDL; these declarations are accepted and dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSpec {
    /// Index name.
    pub name: String,
    /// Indexed column names.
    pub columns: Vec<String>,
}

/// Constraint declaration coming from the host ORM's migration framework.
/// Accepted and dropped, like [`IndexSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    /// Constraint name.
    pub name: String,
}

//! Query types: where-clauses, ordering and limits
//!
//! These types describe *what* to select; evaluation lives in the engine.
//! All of them deserialize from the loose JSON forms callers already use:
//!
//! ```json
//! {"field": "_id", "value": 4}
//! [{"field": "_id", "op": ">", "value": 3}, "&", {"field": "_id", "op": "<", "value": 5}]
//! [[{"field": "a", "value": 1}, "||", {"field": "b", "value": 2}], "and", {"field": "c", "op": "defined"}]
//! ```
//!
//! Parsing is lenient: an unknown operator means `=`, an unknown connector
//! token means `AND`, an unknown direction means ascending.

use crate::value::Value;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Predicates
// =============================================================================

/// Comparison operator of a leaf predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// `=` / `==`
    #[default]
    Eq,
    /// `!=` / `<>`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// String prefix test
    Starts,
    /// String suffix test
    Ends,
    /// Substring test
    Contains,
    /// Field presence test
    Defined,
}

impl Operator {
    /// Parse an operator token, falling back to `Eq` for unknown tokens
    pub fn parse(token: &str) -> Self {
        match token {
            "=" | "==" => Operator::Eq,
            "!=" | "<>" => Operator::Ne,
            "<" => Operator::Lt,
            ">" => Operator::Gt,
            "<=" => Operator::Le,
            ">=" => Operator::Ge,
            "starts" => Operator::Starts,
            "ends" => Operator::Ends,
            "contains" => Operator::Contains,
            "defined" => Operator::Defined,
            _ => Operator::Eq,
        }
    }

    /// Canonical token
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Starts => "starts",
            Operator::Ends => "ends",
            Operator::Contains => "contains",
            Operator::Defined => "defined",
        }
    }
}

impl From<String> for Operator {
    fn from(token: String) -> Self {
        Operator::parse(&token)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

/// Boolean connector between two where-clause items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Connector {
    /// `&`, `&&`, `and`
    #[default]
    And,
    /// `|`, `||`, `or`
    Or,
}

impl Connector {
    /// Parse a connector token (case-insensitive); anything but an OR token is AND
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "|" | "||" | "or" => Connector::Or,
            _ => Connector::And,
        }
    }

    /// Fold `current` into `previous`
    pub fn combine(self, previous: bool, current: bool) -> bool {
        match self {
            Connector::And => previous && current,
            Connector::Or => previous || current,
        }
    }
}

impl From<String> for Connector {
    fn from(token: String) -> Self {
        Connector::parse(&token)
    }
}

impl From<Connector> for String {
    fn from(connector: Connector) -> Self {
        match connector {
            Connector::And => "&".to_string(),
            Connector::Or => "|".to_string(),
        }
    }
}

/// Leaf predicate: `{field, op, value}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Field name looked up on each record
    pub field: String,
    /// Comparison operator (defaults to `=`)
    #[serde(default)]
    pub op: Operator,
    /// Right-hand operand; `None` compares against an absent value
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

/// Keeps an explicit JSON `null` as `Some(Value::Null)`
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Condition {
    /// Create a condition
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Condition {
            field: field.into(),
            op,
            value: Some(value.into()),
        }
    }

    /// `field = value`
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    /// `field defined`
    pub fn defined(field: impl Into<String>) -> Self {
        Condition {
            field: field.into(),
            op: Operator::Defined,
            value: None,
        }
    }

    /// `_id = id`
    pub fn id(id: u64) -> Self {
        Self::equals(crate::record::ID_FIELD, id)
    }
}

/// One item of a where-clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Predicate {
    /// Connector token applied to the next fold
    Connector(Connector),
    /// Nested sub-expression
    Group(Vec<Predicate>),
    /// Leaf comparison
    Condition(Condition),
}

impl From<Condition> for Predicate {
    fn from(condition: Condition) -> Self {
        Predicate::Condition(condition)
    }
}

impl From<Connector> for Predicate {
    fn from(connector: Connector) -> Self {
        Predicate::Connector(connector)
    }
}

impl From<WhereClause> for Predicate {
    fn from(clause: WhereClause) -> Self {
        Predicate::Group(clause.0)
    }
}

/// Ordered sequence of predicates, connectors and groups
///
/// # Example
///
/// ```
/// use jadb_core::query::{Condition, Operator, WhereClause};
///
/// let clause = WhereClause::from(Condition::new("_id", Operator::Gt, 3))
///     .and(Condition::new("_id", Operator::Lt, 5));
/// assert_eq!(clause.items().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WhereRepr")]
pub struct WhereClause(Vec<Predicate>);

#[derive(Deserialize)]
#[serde(untagged)]
enum WhereRepr {
    Many(Vec<Predicate>),
    Single(Condition),
}

impl From<WhereRepr> for WhereClause {
    fn from(repr: WhereRepr) -> Self {
        match repr {
            WhereRepr::Many(items) => WhereClause(items),
            WhereRepr::Single(condition) => WhereClause(vec![condition.into()]),
        }
    }
}

impl WhereClause {
    /// Empty clause (matches every record)
    pub fn new() -> Self {
        WhereClause(Vec::new())
    }

    /// Clause matching a single identifier
    pub fn id(id: u64) -> Self {
        Condition::id(id).into()
    }

    /// Items in evaluation order
    pub fn items(&self) -> &[Predicate] {
        &self.0
    }

    /// Append any predicate item
    pub fn push(mut self, item: impl Into<Predicate>) -> Self {
        self.0.push(item.into());
        self
    }

    /// Append `& item`
    pub fn and(self, item: impl Into<Predicate>) -> Self {
        self.push(Connector::And).push(item)
    }

    /// Append `| item`
    pub fn or(self, item: impl Into<Predicate>) -> Self {
        self.push(Connector::Or).push(item)
    }
}

impl From<Condition> for WhereClause {
    fn from(condition: Condition) -> Self {
        WhereClause(vec![condition.into()])
    }
}

impl From<Vec<Predicate>> for WhereClause {
    fn from(items: Vec<Predicate>) -> Self {
        WhereClause(items)
    }
}

// =============================================================================
// Ordering
// =============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    /// Ascending (default)
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl From<String> for Direction {
    fn from(token: String) -> Self {
        if token == "desc" {
            Direction::Desc
        } else {
            Direction::Asc
        }
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => "asc".to_string(),
            Direction::Desc => "desc".to_string(),
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderKey {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    #[serde(default, rename = "dir")]
    pub direction: Direction,
    /// Compare lower-cased string forms
    #[serde(default)]
    pub ignorecase: bool,
}

impl OrderKey {
    /// Ascending, case-sensitive key
    pub fn asc(field: impl Into<String>) -> Self {
        OrderKey {
            field: field.into(),
            direction: Direction::Asc,
            ignorecase: false,
        }
    }

    /// Descending, case-sensitive key
    pub fn desc(field: impl Into<String>) -> Self {
        OrderKey {
            direction: Direction::Desc,
            ..Self::asc(field)
        }
    }

    /// Compare lower-cased string forms
    pub fn ignore_case(mut self) -> Self {
        self.ignorecase = true;
        self
    }
}

/// Multi-key ordering, evaluated left to right
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "OrderRepr")]
pub struct OrderSpec(Vec<OrderKey>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderRepr {
    Many(Vec<OrderKey>),
    Single(OrderKey),
}

impl From<OrderRepr> for OrderSpec {
    fn from(repr: OrderRepr) -> Self {
        match repr {
            OrderRepr::Many(keys) => OrderSpec(keys),
            OrderRepr::Single(key) => OrderSpec(vec![key]),
        }
    }
}

impl OrderSpec {
    /// Sort keys in priority order
    pub fn keys(&self) -> &[OrderKey] {
        &self.0
    }

    /// Append a lower-priority key
    pub fn then(mut self, key: OrderKey) -> Self {
        self.0.push(key);
        self
    }
}

impl From<OrderKey> for OrderSpec {
    fn from(key: OrderKey) -> Self {
        OrderSpec(vec![key])
    }
}

impl From<Vec<OrderKey>> for OrderSpec {
    fn from(keys: Vec<OrderKey>) -> Self {
        OrderSpec(keys)
    }
}

// =============================================================================
// Limits
// =============================================================================

/// Window `[start, start + count)` over the result
///
/// Deserializes from a plain count or from `{"start", "count"}`. A plain `0`
/// means no limit; the object form is always taken literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "LimitRepr")]
pub struct Limit {
    /// First position to keep
    pub start: usize,
    /// Number of records to keep
    pub count: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LimitRepr {
    Count(usize),
    Window {
        #[serde(default)]
        start: usize,
        #[serde(default)]
        count: usize,
    },
}

impl From<LimitRepr> for Limit {
    fn from(repr: LimitRepr) -> Self {
        match repr {
            LimitRepr::Count(0) => Limit::all(),
            LimitRepr::Count(count) => Limit { start: 0, count },
            LimitRepr::Window { start, count } => Limit { start, count },
        }
    }
}

impl Limit {
    /// Every record
    pub fn all() -> Self {
        Limit {
            start: 0,
            count: usize::MAX,
        }
    }

    /// First `count` records
    pub fn count(count: usize) -> Self {
        Limit { start: 0, count }
    }

    /// `count` records starting at `start`
    pub fn window(start: usize, count: usize) -> Self {
        Limit { start, count }
    }
}

// =============================================================================
// Query
// =============================================================================

/// Filter, order and limit for a select
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Records must match this clause
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<WhereClause>,
    /// Sort order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderSpec>,
    /// Result window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
}

impl Query {
    /// Query returning every record in stored order
    pub fn new() -> Self {
        Query::default()
    }

    /// Set the where-clause
    pub fn filter(mut self, clause: impl Into<WhereClause>) -> Self {
        self.filter = Some(clause.into());
        self
    }

    /// Set the ordering
    pub fn order(mut self, order: impl Into<OrderSpec>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Set the result window
    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }
}

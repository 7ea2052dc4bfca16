use std::fmt;
use std::hash::{Hash, Hasher};
use crate::attribute::attribute::AttributeRef;
use crate::attribute::compound::{CompoundAttribute, CompoundValueTuple};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Value;
use crate::query::logical::{And, Not, Or};

/// Closed set of query kinds. Indexes match on this exhaustively.
pub enum Query<O> {
    Equal(Equal<O>),
    StringStartsWith(StringStartsWith<O>),
    StringEndsWith(StringEndsWith<O>),
    StringContains(StringContains<O>),
    Compound(CompoundQuery<O>),
    And(And<O>),
    Or(Or<O>),
    Not(Not<O>),
}

impl<O> Query<O> {
    /// Evaluate against a single object without touching any index
    pub fn matches(&self, object: &O) -> bool {
        match self {
            Query::Equal(q) => q.matches(object),
            Query::StringStartsWith(q) => q.matches(object),
            Query::StringEndsWith(q) => q.matches(object),
            Query::StringContains(q) => q.matches(object),
            Query::Compound(q) => q.matches(object),
            Query::And(q) => q.matches(object),
            Query::Or(q) => q.matches(object),
            Query::Not(q) => q.matches(object),
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Query::And(_) | Query::Or(_) | Query::Not(_))
    }

    /// Name of the attribute a leaf query targets; None for logical queries
    pub fn attribute_name(&self) -> Option<&str> {
        match self {
            Query::Equal(q) => Some(q.attribute.name()),
            Query::StringStartsWith(q) => Some(q.attribute.name()),
            Query::StringEndsWith(q) => Some(q.attribute.name()),
            Query::StringContains(q) => Some(q.attribute.name()),
            Query::Compound(q) => Some(q.attribute.name()),
            Query::And(_) | Query::Or(_) | Query::Not(_) => None,
        }
    }
}

/// Attribute has a value equal to `value`
pub struct Equal<O> {
    pub attribute: AttributeRef<O>,
    pub value: Value,
}

impl<O> Equal<O> {
    pub fn new(attribute: AttributeRef<O>, value: impl Into<Value>) -> Self {
        Equal { attribute, value: value.into() }
    }

    pub fn matches(&self, object: &O) -> bool {
        self.attribute.values(object).contains(&self.value)
    }
}

/// Attribute has a text value starting with `value`
pub struct StringStartsWith<O> {
    pub attribute: AttributeRef<O>,
    pub value: String,
}

impl<O> StringStartsWith<O> {
    pub fn new(attribute: AttributeRef<O>, value: impl Into<String>) -> Self {
        StringStartsWith { attribute, value: value.into() }
    }

    pub fn matches(&self, object: &O) -> bool {
        any_text(&self.attribute, object, |text| text.starts_with(self.value.as_str()))
    }
}

/// Attribute has a text value ending with `value`
pub struct StringEndsWith<O> {
    pub attribute: AttributeRef<O>,
    pub value: String,
}

impl<O> StringEndsWith<O> {
    pub fn new(attribute: AttributeRef<O>, value: impl Into<String>) -> Self {
        StringEndsWith { attribute, value: value.into() }
    }

    pub fn matches(&self, object: &O) -> bool {
        any_text(&self.attribute, object, |text| text.ends_with(self.value.as_str()))
    }
}

/// Attribute has a text value containing `value`
pub struct StringContains<O> {
    pub attribute: AttributeRef<O>,
    pub value: String,
}

impl<O> StringContains<O> {
    pub fn new(attribute: AttributeRef<O>, value: impl Into<String>) -> Self {
        StringContains { attribute, value: value.into() }
    }

    pub fn matches(&self, object: &O) -> bool {
        any_text(&self.attribute, object, |text| text.contains(self.value.as_str()))
    }
}

fn any_text<O, F>(attribute: &AttributeRef<O>, object: &O, predicate: F) -> bool
where
    F: Fn(&str) -> bool,
{
    attribute.values(object)
        .iter()
        .filter_map(Value::as_text)
        .any(predicate)
}

/// Equality on every member of a compound attribute at once
pub struct CompoundQuery<O> {
    pub attribute: CompoundAttribute<O>,
    pub tuple: CompoundValueTuple,
}

impl<O> CompoundQuery<O> {
    pub fn new(attribute: CompoundAttribute<O>, values: Vec<Value>) -> Result<Self> {
        if values.len() != attribute.len() {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("{} expects {} values, {} supplied", attribute.name(), attribute.len(), values.len()),
            ));
        }
        Ok(CompoundQuery { attribute, tuple: CompoundValueTuple::new(values) })
    }

    /// Rewrite an `and` of `equal` queries as a compound query, if the `and`
    /// constrains exactly the members of `attribute`, each once.
    pub fn from_and(attribute: &CompoundAttribute<O>, and: &And<O>) -> Option<Self> {
        let children = and.children();
        if children.len() != attribute.len() {
            return None;
        }

        let mut slots: Vec<Option<Value>> = vec![None; attribute.len()];
        for child in children {
            let Query::Equal(equal) = child else {
                return None;
            };
            let position = attribute.position_of(equal.attribute.name())?;
            if slots[position].is_some() {
                return None;
            }
            slots[position] = Some(equal.value.clone());
        }

        let values: Option<Vec<Value>> = slots.into_iter().collect();
        Some(CompoundQuery {
            attribute: attribute.clone(),
            tuple: CompoundValueTuple::new(values?),
        })
    }

    pub fn matches(&self, object: &O) -> bool {
        self.attribute.tuples(object).contains(&self.tuple)
    }
}

// Manual impls: deriving would demand `O: Clone + PartialEq` for no reason

impl<O> Clone for Query<O> {
    fn clone(&self) -> Self {
        match self {
            Query::Equal(q) => Query::Equal(Equal { attribute: q.attribute.clone(), value: q.value.clone() }),
            Query::StringStartsWith(q) => Query::StringStartsWith(StringStartsWith { attribute: q.attribute.clone(), value: q.value.clone() }),
            Query::StringEndsWith(q) => Query::StringEndsWith(StringEndsWith { attribute: q.attribute.clone(), value: q.value.clone() }),
            Query::StringContains(q) => Query::StringContains(StringContains { attribute: q.attribute.clone(), value: q.value.clone() }),
            Query::Compound(q) => Query::Compound(CompoundQuery { attribute: q.attribute.clone(), tuple: q.tuple.clone() }),
            Query::And(q) => Query::And(q.clone()),
            Query::Or(q) => Query::Or(q.clone()),
            Query::Not(q) => Query::Not(q.clone()),
        }
    }
}

impl<O> PartialEq for Query<O> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Query::Equal(a), Query::Equal(b)) => a.attribute.name() == b.attribute.name() && a.value == b.value,
            (Query::StringStartsWith(a), Query::StringStartsWith(b)) => a.attribute.name() == b.attribute.name() && a.value == b.value,
            (Query::StringEndsWith(a), Query::StringEndsWith(b)) => a.attribute.name() == b.attribute.name() && a.value == b.value,
            (Query::StringContains(a), Query::StringContains(b)) => a.attribute.name() == b.attribute.name() && a.value == b.value,
            (Query::Compound(a), Query::Compound(b)) => a.attribute == b.attribute && a.tuple == b.tuple,
            (Query::And(a), Query::And(b)) => a == b,
            (Query::Or(a), Query::Or(b)) => a == b,
            (Query::Not(a), Query::Not(b)) => a == b,
            _ => false,
        }
    }
}

impl<O> Eq for Query<O> {}

impl<O> Hash for Query<O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Query::Equal(q) => {
                q.attribute.name().hash(state);
                q.value.hash(state);
            }
            Query::StringStartsWith(q) => {
                q.attribute.name().hash(state);
                q.value.hash(state);
            }
            Query::StringEndsWith(q) => {
                q.attribute.name().hash(state);
                q.value.hash(state);
            }
            Query::StringContains(q) => {
                q.attribute.name().hash(state);
                q.value.hash(state);
            }
            Query::Compound(q) => {
                q.attribute.name().hash(state);
                q.tuple.hash(state);
            }
            // Logical nodes hash once at construction
            Query::And(q) => q.hash_code().hash(state),
            Query::Or(q) => q.hash_code().hash(state),
            Query::Not(q) => q.hash_code().hash(state),
        }
    }
}

impl<O> fmt::Display for Query<O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Query::Equal(q) => write!(f, "equal({}, {})", q.attribute.name(), q.value),
            Query::StringStartsWith(q) => write!(f, "startsWith({}, {})", q.attribute.name(), q.value),
            Query::StringEndsWith(q) => write!(f, "endsWith({}, {})", q.attribute.name(), q.value),
            Query::StringContains(q) => write!(f, "contains({}, {})", q.attribute.name(), q.value),
            Query::Compound(q) => write!(f, "equal({}, {})", q.attribute.name(), q.tuple),
            Query::And(q) => write_children(f, "and", q.children()),
            Query::Or(q) => write_children(f, "or", q.children()),
            Query::Not(q) => write!(f, "not({})", q.negated_query()),
        }
    }
}

fn write_children<O>(f: &mut fmt::Formatter, name: &str, children: &[Query<O>]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

impl<O> fmt::Debug for Query<O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

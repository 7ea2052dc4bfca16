use std::sync::Arc;
use crate::core::types::Value;

/// Shared handle to an attribute; queries and indexes hold these
pub type AttributeRef<O> = Arc<dyn Attribute<O>>;

type Extractor<O, T> = Arc<dyn Fn(&O) -> T + Send + Sync>;

/// Reads zero, one or many values from an object.
///
/// Attributes are identified by name: two attributes with the same name are
/// considered the same attribute by queries and indexes.
pub trait Attribute<O>: Send + Sync {
    fn name(&self) -> &str;

    fn values(&self, object: &O) -> Vec<Value>;

    /// True when every object has exactly one value for this attribute.
    /// Indexes rely on this to skip duplicate elimination across keys.
    fn is_single_valued(&self) -> bool {
        false
    }
}

/// Exactly one value per object
pub struct SimpleAttribute<O> {
    name: String,
    extract: Extractor<O, Value>,
}

impl<O> SimpleAttribute<O> {
    pub fn new<F>(name: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&O) -> Value + Send + Sync + 'static,
    {
        SimpleAttribute {
            name: name.into(),
            extract: Arc::new(extract),
        }
    }

    pub fn value(&self, object: &O) -> Value {
        (self.extract)(object)
    }
}

impl<O> Attribute<O> for SimpleAttribute<O> {
    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self, object: &O) -> Vec<Value> {
        vec![self.value(object)]
    }

    fn is_single_valued(&self) -> bool {
        true
    }
}

/// Zero or one value per object
pub struct NullableAttribute<O> {
    name: String,
    extract: Extractor<O, Option<Value>>,
}

impl<O> NullableAttribute<O> {
    pub fn new<F>(name: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&O) -> Option<Value> + Send + Sync + 'static,
    {
        NullableAttribute {
            name: name.into(),
            extract: Arc::new(extract),
        }
    }
}

impl<O> Attribute<O> for NullableAttribute<O> {
    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self, object: &O) -> Vec<Value> {
        (self.extract)(object).into_iter().collect()
    }
}

/// Any number of values per object (tags, keywords, ...)
pub struct MultiValueAttribute<O> {
    name: String,
    extract: Extractor<O, Vec<Value>>,
}

impl<O> MultiValueAttribute<O> {
    pub fn new<F>(name: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&O) -> Vec<Value> + Send + Sync + 'static,
    {
        MultiValueAttribute {
            name: name.into(),
            extract: Arc::new(extract),
        }
    }
}

impl<O> Attribute<O> for MultiValueAttribute<O> {
    fn name(&self) -> &str {
        &self.name
    }

    fn values(&self, object: &O) -> Vec<Value> {
        (self.extract)(object)
    }
}

pub fn simple<O: 'static, F>(name: impl Into<String>, extract: F) -> AttributeRef<O>
where
    F: Fn(&O) -> Value + Send + Sync + 'static,
{
    Arc::new(SimpleAttribute::new(name, extract))
}

pub fn nullable<O: 'static, F>(name: impl Into<String>, extract: F) -> AttributeRef<O>
where
    F: Fn(&O) -> Option<Value> + Send + Sync + 'static,
{
    Arc::new(NullableAttribute::new(name, extract))
}

pub fn multi<O: 'static, F>(name: impl Into<String>, extract: F) -> AttributeRef<O>
where
    F: Fn(&O) -> Vec<Value> + Send + Sync + 'static,
{
    Arc::new(MultiValueAttribute::new(name, extract))
}

pub fn same_attribute<O>(a: &AttributeRef<O>, b: &AttributeRef<O>) -> bool {
    a.name() == b.name()
}

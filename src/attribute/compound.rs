use std::fmt;
use serde::{Serialize, Deserialize};
use crate::attribute::attribute::AttributeRef;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Value;

/// Ordered tuple of attribute values for one object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompoundValueTuple {
    pub values: Vec<Value>,
}

impl CompoundValueTuple {
    pub fn new(values: Vec<Value>) -> Self {
        CompoundValueTuple { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }
}

impl fmt::Display for CompoundValueTuple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

/// Ordered combination of attributes.
/// (make, model) and (model, make) are different compound attributes.
pub struct CompoundAttribute<O> {
    attributes: Vec<AttributeRef<O>>,
    name: String,
}

impl<O> CompoundAttribute<O> {
    pub fn new(attributes: Vec<AttributeRef<O>>) -> Result<Self> {
        if attributes.len() < 2 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("A compound attribute needs at least 2 attributes, {} supplied", attributes.len()),
            ));
        }

        let names: Vec<&str> = attributes.iter().map(|a| a.name()).collect();
        let name = format!("compound({})", names.join(", "));

        Ok(CompoundAttribute { attributes, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[AttributeRef<O>] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Position of the named attribute within the tuple
    pub fn position_of(&self, attribute_name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name() == attribute_name)
    }

    /// Cartesian product of the member attributes' values.
    /// An object missing a value for any member produces no tuple.
    pub fn tuples(&self, object: &O) -> Vec<CompoundValueTuple> {
        let mut partial: Vec<Vec<Value>> = vec![Vec::with_capacity(self.attributes.len())];

        for attribute in &self.attributes {
            let values = attribute.values(object);
            if values.is_empty() {
                return Vec::new();
            }

            partial = partial
                .into_iter()
                .flat_map(|prefix| {
                    values.iter().map(move |value| {
                        let mut tuple = prefix.clone();
                        tuple.push(value.clone());
                        tuple
                    })
                })
                .collect();
        }

        partial.into_iter().map(CompoundValueTuple::new).collect()
    }
}

impl<O> Clone for CompoundAttribute<O> {
    fn clone(&self) -> Self {
        CompoundAttribute {
            attributes: self.attributes.clone(),
            name: self.name.clone(),
        }
    }
}

impl<O> PartialEq for CompoundAttribute<O> {
    fn eq(&self, other: &Self) -> bool {
        self.attributes.len() == other.attributes.len()
            && self.attributes.iter()
                .zip(other.attributes.iter())
                .all(|(a, b)| a.name() == b.name())
    }
}

impl<O> Eq for CompoundAttribute<O> {}

impl<O> fmt::Debug for CompoundAttribute<O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

use crate::attribute::attribute::AttributeRef;
use crate::attribute::compound::CompoundAttribute;
use crate::core::error::Result;
use crate::core::types::Value;
use crate::query::ast::{CompoundQuery, Equal, Query, StringContains, StringEndsWith, StringStartsWith};
use crate::query::logical::{And, Not, Or};

pub fn equal<O>(attribute: &AttributeRef<O>, value: impl Into<Value>) -> Query<O> {
    Query::Equal(Equal::new(attribute.clone(), value))
}

pub fn starts_with<O>(attribute: &AttributeRef<O>, prefix: &str) -> Query<O> {
    Query::StringStartsWith(StringStartsWith::new(attribute.clone(), prefix))
}

pub fn ends_with<O>(attribute: &AttributeRef<O>, suffix: &str) -> Query<O> {
    Query::StringEndsWith(StringEndsWith::new(attribute.clone(), suffix))
}

pub fn contains<O>(attribute: &AttributeRef<O>, fragment: &str) -> Query<O> {
    Query::StringContains(StringContains::new(attribute.clone(), fragment))
}

pub fn compound<O>(attribute: &CompoundAttribute<O>, values: Vec<Value>) -> Result<Query<O>> {
    Ok(Query::Compound(CompoundQuery::new(attribute.clone(), values)?))
}

pub fn and<O>(children: Vec<Query<O>>) -> Result<Query<O>> {
    Ok(Query::And(And::new(children)?))
}

pub fn or<O>(children: Vec<Query<O>>) -> Result<Query<O>> {
    Ok(Query::Or(Or::new(children)?))
}

pub fn not<O>(query: Query<O>) -> Query<O> {
    Query::Not(Not::new(query))
}

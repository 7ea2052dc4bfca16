use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use crate::core::error::{Error, Result};
use crate::query::ast::Query;

/// Logical AND over two or more child queries
pub struct And<O> {
    children: Vec<Query<O>>,
    hash_code: u64,
}

impl<O> And<O> {
    pub fn new(children: Vec<Query<O>>) -> Result<Self> {
        if children.len() < 2 {
            return Err(Error::invalid_query(format!(
                "An 'and' query cannot have fewer than 2 child queries, {} were supplied",
                children.len()
            )));
        }
        let hash_code = hash_children("and", &children);
        Ok(And { children, hash_code })
    }

    pub fn children(&self) -> &[Query<O>] {
        &self.children
    }

    pub fn simple_queries(&self) -> impl Iterator<Item = &Query<O>> {
        self.children.iter().filter(|q| !q.is_logical())
    }

    pub fn logical_queries(&self) -> impl Iterator<Item = &Query<O>> {
        self.children.iter().filter(|q| q.is_logical())
    }

    /// True iff every child matches; leaves are tried before nested logic
    pub fn matches(&self, object: &O) -> bool {
        self.simple_queries().all(|q| q.matches(object))
            && self.logical_queries().all(|q| q.matches(object))
    }

    pub fn hash_code(&self) -> u64 {
        self.hash_code
    }
}

/// Logical OR over two or more child queries
pub struct Or<O> {
    children: Vec<Query<O>>,
    hash_code: u64,
}

impl<O> Or<O> {
    pub fn new(children: Vec<Query<O>>) -> Result<Self> {
        if children.len() < 2 {
            return Err(Error::invalid_query(format!(
                "An 'or' query cannot have fewer than 2 child queries, {} were supplied",
                children.len()
            )));
        }
        let hash_code = hash_children("or", &children);
        Ok(Or { children, hash_code })
    }

    pub fn children(&self) -> &[Query<O>] {
        &self.children
    }

    pub fn simple_queries(&self) -> impl Iterator<Item = &Query<O>> {
        self.children.iter().filter(|q| !q.is_logical())
    }

    pub fn logical_queries(&self) -> impl Iterator<Item = &Query<O>> {
        self.children.iter().filter(|q| q.is_logical())
    }

    pub fn matches(&self, object: &O) -> bool {
        self.simple_queries().any(|q| q.matches(object))
            || self.logical_queries().any(|q| q.matches(object))
    }

    pub fn hash_code(&self) -> u64 {
        self.hash_code
    }
}

/// Logical negation of exactly one child query
pub struct Not<O> {
    negated: Box<Query<O>>,
    hash_code: u64,
}

impl<O> Not<O> {
    pub fn new(negated: Query<O>) -> Self {
        let hash_code = hash_children("not", std::slice::from_ref(&negated));
        Not { negated: Box::new(negated), hash_code }
    }

    /// Build from an arbitrary child list; anything but exactly one child is rejected
    pub fn from_children(mut children: Vec<Query<O>>) -> Result<Self> {
        if children.len() != 1 {
            return Err(Error::invalid_query(format!(
                "A 'not' query requires exactly 1 child query, {} were supplied",
                children.len()
            )));
        }
        match children.pop() {
            Some(negated) => Ok(Not::new(negated)),
            None => Err(Error::invalid_query("A 'not' query requires exactly 1 child query")),
        }
    }

    pub fn negated_query(&self) -> &Query<O> {
        &self.negated
    }

    pub fn matches(&self, object: &O) -> bool {
        !self.negated.matches(object)
    }

    pub fn hash_code(&self) -> u64 {
        self.hash_code
    }
}

fn hash_children<O>(kind: &str, children: &[Query<O>]) -> u64 {
    let mut hasher = DefaultHasher::new();
    kind.hash(&mut hasher);
    children.hash(&mut hasher);
    hasher.finish()
}

impl<O> Clone for And<O> {
    fn clone(&self) -> Self {
        And { children: self.children.clone(), hash_code: self.hash_code }
    }
}

impl<O> Clone for Or<O> {
    fn clone(&self) -> Self {
        Or { children: self.children.clone(), hash_code: self.hash_code }
    }
}

impl<O> Clone for Not<O> {
    fn clone(&self) -> Self {
        Not { negated: self.negated.clone(), hash_code: self.hash_code }
    }
}

// Children compare in order: and(a, b) != and(b, a)

impl<O> PartialEq for And<O> {
    fn eq(&self, other: &Self) -> bool {
        self.hash_code == other.hash_code && self.children == other.children
    }
}

impl<O> PartialEq for Or<O> {
    fn eq(&self, other: &Self) -> bool {
        self.hash_code == other.hash_code && self.children == other.children
    }
}

impl<O> PartialEq for Not<O> {
    fn eq(&self, other: &Self) -> bool {
        self.hash_code == other.hash_code && self.negated == other.negated
    }
}

#![allow(dead_code)]

use Querix::attribute::attribute::{multi, simple};
use Querix::{AttributeRef, ResultSet, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Car {
    pub id: u32,
    pub make: String,
    pub model: String,
    pub price: i64,
    pub features: Vec<String>,
}

impl Car {
    pub fn new(id: u32, make: &str, model: &str, price: i64, features: &[&str]) -> Self {
        Car {
            id,
            make: make.to_string(),
            model: model.to_string(),
            price,
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }
}

pub fn make() -> AttributeRef<Car> {
    simple("make", |c: &Car| Value::from(c.make.as_str()))
}

pub fn model() -> AttributeRef<Car> {
    simple("model", |c: &Car| Value::from(c.model.as_str()))
}

pub fn price() -> AttributeRef<Car> {
    simple("price", |c: &Car| Value::Integer(c.price))
}

pub fn features() -> AttributeRef<Car> {
    multi("features", |c: &Car| c.features.iter().map(|f| Value::from(f.as_str())).collect())
}

/// Accord, Civic, Focus plus a few more to give buckets some depth
pub fn cars() -> Vec<Car> {
    vec![
        Car::new(1, "Honda", "Accord", 5500, &["sunroof", "radio"]),
        Car::new(2, "Honda", "Civic", 4200, &["radio"]),
        Car::new(3, "Ford", "Focus", 4900, &["sunroof", "navigation", "radio"]),
        Car::new(4, "Ford", "Fusion", 6100, &[]),
        Car::new(5, "Toyota", "Prius", 5300, &["navigation"]),
        Car::new(6, "Honda", "Civic", 4800, &["sunroof"]),
    ]
}

/// Ids yielded by a view, sorted, duplicates kept
pub fn ids(result: &ResultSet<Car>) -> Vec<u32> {
    let mut ids: Vec<u32> = result.iter().map(|c| c.id).collect();
    ids.sort();
    ids
}

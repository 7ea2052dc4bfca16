/// Querix API Demo
///
/// Demonstrates the main index operations:
/// - Declaring attributes over a plain struct
/// - Building exact, prefix, suffix, substring and compound indexes
/// - Boolean queries and lazy result views
/// - Incremental add/remove and clear
/// - Quantized compound keys

use Querix::attribute::attribute::{multi, simple};
use Querix::index::compound::CompoundIndex;
use Querix::index::hash::HashIndex;
use Querix::index::radix_index::RadixTreeIndex;
use Querix::index::reversed::ReversedRadixTreeIndex;
use Querix::index::suffix_index::SuffixTreeIndex;
use Querix::quantizer::{IntegerQuantizer, QuantizerRef, TupleQuantizer};
use Querix::query::factory::{and, compound, contains, ends_with, equal, not, starts_with};
use Querix::{CompoundAttribute, DeduplicationOption, Index, QueryOptions, ResultSet, Value};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Car {
    id: u32,
    make: &'static str,
    model: &'static str,
    price: i64,
    features: Vec<&'static str>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   Querix - Indexed Query Engine Demo          ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Step 1: Attributes
    let make = simple("make", |c: &Car| Value::from(c.make));
    let model = simple("model", |c: &Car| Value::from(c.model));
    let price = simple("price", |c: &Car| Value::Integer(c.price));
    let features = multi("features", |c: &Car| c.features.iter().map(|f| Value::from(*f)).collect());

    let cars = vec![
        Car { id: 1, make: "Honda", model: "Accord", price: 5500, features: vec!["sunroof", "radio"] },
        Car { id: 2, make: "Honda", model: "Civic", price: 4200, features: vec!["radio"] },
        Car { id: 3, make: "Ford", model: "Focus", price: 4900, features: vec!["sunroof", "navigation"] },
        Car { id: 4, make: "Ford", model: "Fusion", price: 6100, features: vec![] },
        Car { id: 5, make: "Toyota", model: "Prius", price: 5300, features: vec!["navigation"] },
    ];

    // Step 2: Indexes
    println!("Step 2: Building indexes over {} cars...", cars.len());
    let by_make = HashIndex::on_attribute(make.clone());
    let by_prefix = RadixTreeIndex::on_attribute(model.clone());
    let by_suffix = ReversedRadixTreeIndex::on_attribute(model.clone());
    let by_substring = SuffixTreeIndex::on_attribute(model.clone());
    let by_feature = RadixTreeIndex::on_attribute(features.clone());
    let by_make_model = CompoundIndex::on_attributes(vec![make.clone(), model.clone()])?;

    let indexes: [&dyn Index<Car>; 6] = [&by_make, &by_prefix, &by_suffix, &by_substring, &by_feature, &by_make_model];
    for index in indexes {
        index.init(&cars);
        let stats = index.stats();
        println!("  {} on {}: {} keys, {} entries", stats.index_type, stats.attribute, stats.distinct_keys, stats.total_entries);
    }
    println!();

    // Step 3: Retrieval
    println!("Step 3: Retrieval...");
    let options = QueryOptions::new();
    show("equal(make, Honda)", &by_make.retrieve(&equal(&make, "Honda"), &options)?);
    show("startsWith(model, F)", &by_prefix.retrieve(&starts_with(&model, "F"), &options)?);
    show("endsWith(model, us)", &by_suffix.retrieve(&ends_with(&model, "us"), &options)?);
    show("contains(model, cc)", &by_substring.retrieve(&contains(&model, "cc"), &options)?);

    let honda_civic = compound(by_make_model.compound_attribute(), vec!["Honda".into(), "Civic".into()])?;
    show("equal(compound(make, model), (Honda, Civic))", &by_make_model.retrieve(&honda_civic, &options)?);

    // Unsupported queries fail instead of silently scanning
    match by_make.retrieve(&contains(&model, "cc"), &options) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  HashIndex refused: {}", e),
    }
    println!();

    // Step 4: Deduplication on multi-valued attributes
    println!("Step 4: Deduplication...");
    let any_feature = starts_with(&features, "");
    let all = by_feature.retrieve(&any_feature, &options)?;
    let dedup = QueryOptions::new().with(DeduplicationOption::logical_elimination());
    let distinct = by_feature.retrieve(&any_feature, &dedup)?;
    println!("  without dedup: {} ({:?})", all.size(), all.kind());
    println!("  with dedup:    {} ({:?})\n", distinct.size(), distinct.kind());

    // Step 5: Matching without an index
    println!("Step 5: Boolean matching...");
    let query = and(vec![
        equal(&features, "sunroof"),
        not(equal(&make, "Ford")),
    ])?;
    let matched: Vec<u32> = cars.iter().filter(|c| query.matches(c)).map(|c| c.id).collect();
    println!("  {} -> {:?}\n", query, matched);

    // Step 6: Incremental maintenance
    println!("Step 6: Incremental maintenance...");
    by_substring.notify_objects_removed(&cars[..1]);
    show("contains(model, cc) after removing Accord", &by_substring.retrieve(&contains(&model, "cc"), &options)?);
    by_substring.notify_objects_cleared();
    println!("  after clear: {} keys\n", by_substring.stats().distinct_keys);

    // Step 7: Quantized compound index
    println!("Step 7: Quantized compound keys...");
    let price_buckets: QuantizerRef<Value> = Arc::new(IntegerQuantizer::with_compression_factor(1000)?);
    let quantized = CompoundIndex::with_quantizer_on_attributes(
        Arc::new(TupleQuantizer::at(2, 1, price_buckets)),
        vec![make.clone(), price.clone()],
    )?;
    quantized.init(&cars);
    let make_price = CompoundAttribute::new(vec![make.clone(), price.clone()])?;
    let query = compound(&make_price, vec!["Ford".into(), Value::Integer(4900)])?;
    let result = quantized.retrieve(&query, &options)?;
    println!("  {} keys for {} cars", quantized.stats().distinct_keys, cars.len());
    show("equal(compound(make, price), (Ford, 4900))", &result);

    println!("\nDone!");
    Ok(())
}

fn show(label: &str, result: &ResultSet<Car>) {
    let mut models: Vec<&str> = result.iter().map(|c| c.model).collect();
    models.sort();
    println!(
        "  {:<48} {:?}  (cost {}, merge {})",
        label,
        models,
        result.retrieval_cost(),
        result.merge_cost()
    );
}

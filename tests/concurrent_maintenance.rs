mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use crossbeam::channel::RecvTimeoutError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use common::{cars, features, make, model, Car};
use Querix::index::compound::CompoundIndex;
use Querix::index::hash::HashIndex;
use Querix::index::radix_index::RadixTreeIndex;
use Querix::index::reversed::ReversedRadixTreeIndex;
use Querix::index::suffix_index::SuffixTreeIndex;
use Querix::query::factory::{compound, contains, ends_with, equal, starts_with};
use Querix::{CompoundAttribute, Index, KeyStatistics, Query, QueryOptions, Value};

const MODELS: [&str; 6] = ["Accord", "Civic", "Focus", "Fusion", "Prius", "Corolla"];
const FEATURES: [&str; 4] = ["sunroof", "radio", "navigation", "heated seats"];

fn random_cars(rng: &mut StdRng, count: u32) -> Vec<Car> {
    (0..count)
        .map(|id| {
            let model = MODELS[rng.gen_range(0..MODELS.len())];
            let feature_count = rng.gen_range(0..=FEATURES.len());
            let mut features: Vec<&str> = FEATURES.to_vec();
            features.shuffle(rng);
            features.truncate(feature_count);
            Car::new(id, "Make", model, rng.gen_range(1000..9000), &features)
        })
        .collect()
}

#[test]
fn test_concurrent_adds_lose_nothing() {
    let mut rng = StdRng::seed_from_u64(7);
    let cars = random_cars(&mut rng, 4000);
    let index = HashIndex::on_attribute(model());

    // Every thread races to create the same few buckets
    crossbeam::scope(|scope| {
        for chunk in cars.chunks(500) {
            let index = &index;
            scope.spawn(move |_| {
                for car in chunk {
                    index.notify_objects_added(std::slice::from_ref(car));
                }
            });
        }
    })
    .unwrap();

    assert_eq!(index.stats().total_entries, 4000);
    for name in MODELS {
        let expected = cars.iter().filter(|c| c.model == name).count();
        assert_eq!(index.count_for_key(&Value::from(name)), expected);
    }
}

#[test]
fn test_concurrent_add_remove_leaves_no_empty_bucket() {
    let mut rng = StdRng::seed_from_u64(11);
    let cars = random_cars(&mut rng, 2000);
    let index = SuffixTreeIndex::on_attribute(features());

    crossbeam::scope(|scope| {
        for (worker, chunk) in cars.chunks(250).enumerate() {
            let index = &index;
            scope.spawn(move |_| {
                let mut rng = StdRng::seed_from_u64(worker as u64);
                for _ in 0..3 {
                    for car in chunk {
                        index.notify_objects_added(std::slice::from_ref(car));
                    }
                    let mut order: Vec<&Car> = chunk.iter().collect();
                    order.shuffle(&mut rng);
                    for car in order {
                        index.notify_objects_removed(std::slice::from_ref(car));
                    }
                }
            });
        }
    })
    .unwrap();

    assert_eq!(index.key_count(), 0);
    assert_eq!(index.stats().total_entries, 0);
}

#[test]
fn test_readers_see_consistent_snapshots_across_clear() {
    let mut rng = StdRng::seed_from_u64(3);
    let cars = random_cars(&mut rng, 1000);
    let index = RadixTreeIndex::on_attribute(model());
    index.init(&cars);
    let done = AtomicBool::new(false);

    crossbeam::scope(|scope| {
        for _ in 0..4 {
            let index = &index;
            let done = &done;
            scope.spawn(move |_| {
                let query = starts_with(&model(), "C");
                while !done.load(Ordering::Acquire) {
                    let result = index.retrieve(&query, &QueryOptions::new()).unwrap();
                    // Whatever snapshot was taken, every object in it matches
                    for car in result.iter() {
                        assert!(car.model.starts_with('C'));
                    }
                }
            });
        }

        let index = &index;
        let cars = &cars;
        let done = &done;
        scope.spawn(move |_| {
            for _ in 0..50 {
                index.notify_objects_cleared();
                index.notify_objects_added(cars);
            }
            done.store(true, Ordering::Release);
        });
    })
    .unwrap();

    let expected = cars.iter().filter(|c| c.model.starts_with('C')).count();
    let result = index.retrieve(&starts_with(&model(), "C"), &QueryOptions::new()).unwrap();
    assert_eq!(result.size(), expected);
}

#[test]
fn test_views_are_stable_after_clear() {
    let mut rng = StdRng::seed_from_u64(5);
    let cars = random_cars(&mut rng, 500);
    let index = SuffixTreeIndex::on_attribute(model());
    index.init(&cars);

    let views: Vec<_> = MODELS
        .iter()
        .map(|name| index.retrieve(&equal(&model(), *name), &QueryOptions::new()).unwrap())
        .collect();
    let sizes: Vec<usize> = views.iter().map(|view| view.size()).collect();

    index.notify_objects_cleared();
    assert!(index.retrieve(&contains(&model(), "o"), &QueryOptions::new()).unwrap().is_empty());
    assert_eq!(views.iter().map(|view| view.size()).collect::<Vec<_>>(), sizes);
    assert_eq!(sizes.iter().sum::<usize>(), 500);
}

#[test]
fn test_removing_objects_while_iterating_their_view() {
    let (done_tx, done_rx) = crossbeam::channel::bounded(1);

    // Runs off the test thread so a lock held by the loop shows up as a timeout
    let worker = std::thread::spawn(move || {
        let cars = cars();
        let make_model = CompoundAttribute::new(vec![make(), model()]).unwrap();
        let honda_civic = compound(&make_model, vec!["Honda".into(), "Civic".into()]).unwrap();
        let cases: Vec<(Box<dyn Index<Car>>, Query<Car>, usize)> = vec![
            (Box::new(HashIndex::on_attribute(model())), equal(&model(), "Civic"), 2),
            (Box::new(RadixTreeIndex::on_attribute(model())), starts_with(&model(), "F"), 2),
            (Box::new(ReversedRadixTreeIndex::on_attribute(model())), ends_with(&model(), "us"), 2),
            (Box::new(SuffixTreeIndex::on_attribute(features())), contains(&features(), "roof"), 3),
            (Box::new(CompoundIndex::on_attribute(make_model)), honda_civic, 2),
        ];

        for (index, query, expected) in cases {
            index.init(&cars);
            let view = index.retrieve(&query, &QueryOptions::new()).unwrap();
            let mut removed = 0;
            for car in view.iter() {
                assert!(index.notify_objects_removed(std::slice::from_ref(&car)));
                removed += 1;
            }
            let index_type = index.stats().index_type;
            assert_eq!(removed, expected, "{}", index_type);
            assert!(view.is_empty(), "{}", index_type);

            // Re-adding from inside a loop over the same view
            index.notify_objects_added(&cars);
            let mut readded = 0;
            for car in view.iter() {
                index.notify_objects_added(&[Car::new(car.id + 100, &car.make, &car.model, car.price, &[])]);
                readded += 1;
            }
            assert_eq!(readded, expected, "{}", index_type);
        }
        done_tx.send(()).unwrap();
    });

    let outcome = done_rx.recv_timeout(Duration::from_secs(5));
    assert_ne!(outcome, Err(RecvTimeoutError::Timeout), "maintenance inside a view loop blocked");
    worker.join().unwrap();
}

//! Quick benchmark of the two copy strategies

use std::collections::HashMap;
use std::time::Instant;

use kitbag::copier::copy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Order {
    id: i64,
    customer: String,
    items: Vec<String>,
    total: f64,
    shipped: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct OrderSummary {
    id: i64,
    customer: String,
    total: f64,
}

kitbag::impl_record!(Order, OrderSummary);

fn report(label: &str, iterations: u32, run: impl Fn()) {
    // Warm up
    for _ in 0..1_000 {
        run();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        run();
    }
    let elapsed = start.elapsed();

    println!("{label}");
    println!("  Time for {} iterations: {:?}", iterations, elapsed);
    println!("  Per operation: {:?}\n", elapsed / iterations);
}

fn main() {
    let order = Order {
        id: 42,
        customer: "polaris".into(),
        items: (0..8).map(|i| format!("sku-{i}")).collect(),
        total: 199.5,
        shipped: true,
    };

    println!("Copy Performance");
    println!("================\n");

    let iterations = 100_000;

    report("struct -> same struct (structural)", iterations, || {
        let mut dst = Order::default();
        let _ = copy(&mut dst, &order);
    });

    report("struct -> smaller struct (structural)", iterations, || {
        let mut dst = OrderSummary::default();
        let _ = copy(&mut dst, &order);
    });

    report("struct -> map (round trip)", iterations, || {
        let mut dst: HashMap<String, Value> = HashMap::new();
        let _ = copy(&mut dst, &order);
    });

    let mut as_map: HashMap<String, Value> = HashMap::new();
    if let Err(e) = copy(&mut as_map, &order) {
        eprintln!("setup failed: {e}");
        return;
    }
    report("map -> struct (round trip)", iterations, || {
        let mut dst = Order::default();
        let _ = copy(&mut dst, &as_map);
    });
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serve two named collections, then reload one of them from changed data.

use understory_label_collections::{Collections, MemorySource, parse_endpoint_configs};
use understory_label_index::{LabelInput, QueryWindow};

fn grid(n: usize, t: f64, prefix: &str) -> Vec<LabelInput> {
    (0..n * n)
        .map(|i| {
            LabelInput::new(
                (i % n) as f64,
                (i / n) as f64,
                t,
                i as i64,
                format!("{prefix}{i}"),
            )
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("understory_label_collections=info".parse().unwrap()),
        )
        .init();

    let configs = parse_endpoint_configs(
        r#"[
            {"name": "towns", "path": "towns.labels"},
            {"name": "peaks", "path": "peaks.labels"},
            {"name": "rivers", "path": "rivers.labels"}
        ]"#,
    )
    .expect("demo configuration is valid");

    let source = MemorySource::new();
    source.insert("towns.labels", grid(32, 10.0, "town "));
    source.insert("peaks.labels", grid(8, 50.0, "peak "));
    // No rivers yet: that collection starts out unavailable.

    let collections = Collections::new(configs, source);
    println!("available: {:?}", collections.names());

    let window = QueryWindow::new(5.0, 0.0, 3.0, 0.0, 3.0);
    for name in collections.names() {
        let labels = collections.query(name, &window).expect("listed names are available");
        println!("{name}: {} labels in window", labels.len());
    }

    if let Err(err) = collections.reload("rivers") {
        println!("rivers still unavailable: {err}");
    }

    // The rivers file shows up, and the towns file is rewritten with fewer labels.
    collections.source().insert("rivers.labels", grid(4, 20.0, "river "));
    collections.source().insert("towns.labels", grid(2, 10.0, "town "));
    for name in ["rivers", "towns"] {
        match collections.reload(name) {
            Ok(()) => println!("reloaded {name}"),
            Err(err) => println!("reload of {name} failed: {err}"),
        }
    }
    println!("available: {:?}", collections.names());
    println!(
        "towns: {} labels in window",
        collections.query("towns", &window).map_or(0, |l| l.len())
    );

    println!("{collections:?}");
}

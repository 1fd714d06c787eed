// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a label index, query it at a few zoom levels, and walk the tree.

use kurbo::Rect;
use understory_label_index::{BuildOptions, IndexBuilder, LabelInput, QueryWindow};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("understory_label_index=debug".parse().unwrap()),
        )
        .init();

    let labels = vec![
        LabelInput::new(13.40, 52.52, 90.0, 1, "Berlin").with_priority(1),
        LabelInput::new(11.58, 48.14, 70.0, 2, "Munich").with_priority(1),
        LabelInput::new(9.99, 53.55, 75.0, 3, "Hamburg").with_priority(1),
        LabelInput::new(13.74, 51.05, 40.0, 4, "Dresden").with_priority(2),
        LabelInput::new(12.37, 51.34, 45.0, 5, "Leipzig").with_priority(2),
        LabelInput::new(13.06, 52.40, 20.0, 6, "Potsdam").with_priority(3),
        LabelInput::new(13.29, 52.46, 5.0, 7, "Zehlendorf")
            .with_priority(4)
            .with_scale(0.6),
    ];

    let index = IndexBuilder::new()
        .with_options(BuildOptions { bucket_size: 2 })
        .build(labels)
        .expect("demo labels are well-formed");
    index.validate().expect("fresh builds are valid");
    println!("{index:?}");

    let germany = Rect::new(5.0, 47.0, 15.0, 55.0);
    for min_t in [80.0, 50.0, 10.0, 0.0] {
        let hits = index.query(&QueryWindow::from_rect(min_t, germany));
        let names: Vec<_> = hits.iter().map(|l| l.text()).collect();
        println!("t >= {min_t:>4}: {names:?}");
    }

    let around_berlin = QueryWindow::new(0.0, 13.0, 13.5, 52.3, 52.6);
    println!("around Berlin: {} labels", index.count(&around_berlin));

    if let Some(root) = index.root() {
        println!(
            "root splits on {:?} at {:?}, subtree max t = {}",
            root.axis(),
            root.labels().first().map(|l| l.text()),
            root.max_t()
        );
    }
}

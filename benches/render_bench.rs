use cardgrid::rendering::{grid, template};
use cardgrid::{DataRecord, GridConfig, StyleDescriptor, DEFAULT_CONTAINER};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_layout(c: &mut Criterion) {
    let config = GridConfig {
        columns: 6,
        gap: 24.0,
        min_width: 280.0,
        max_width: 1440.0,
    };

    c.bench_function("generate_full_layout", |b| {
        b.iter(|| grid::generate_full_layout(black_box(&config), DEFAULT_CONTAINER).unwrap())
    });
}

fn bench_binding(c: &mut Criterion) {
    let style = StyleDescriptor::from_json(
        r#"{
            "id": "bench",
            "name": "Bench",
            "template": {"html": "<img src=\"{{image}}\"/><h3>{{name}}</h3><p>{{description}}</p><span>{{price}}</span>", "css": ""},
            "fields": {
                "image": {"default": "https://example.com/p.png"},
                "name": {"default": "Product"},
                "description": {"default": ""},
                "price": {"default": "$1"}
            },
            "dataMapping": {
                "image": ["image", "url"],
                "name": ["name", "title"],
                "description": ["description", "desc"],
                "price": ["price"]
            }
        }"#,
    )
    .unwrap();

    let mut record = DataRecord::new();
    record.insert("title", serde_json::json!("Walnut Desk"));
    record.insert("price", serde_json::json!("$420"));
    record.insert("url", serde_json::json!("https://drive.google.com/file/d/BENCH/view"));
    record.insert("description", serde_json::json!("Solid walnut, oiled finish"));

    c.bench_function("bind_record", |b| {
        b.iter(|| template::bind_record(black_box(&style), black_box(Some(&record))))
    });
}

criterion_group!(benches, bench_layout, bench_binding);
criterion_main!(benches);

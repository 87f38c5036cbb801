use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tagsieve::{bad_protocol, AllowedProtocols};

fn bench_protocol_filter(c: &mut Criterion) {
    let allowed = AllowedProtocols::default();
    let mut group = c.benchmark_group("protocol_filter");

    let test_cases = vec![
        ("clean_url", "http://example.com/path?query=1"),
        ("relative", "/forum/thread.php?id=3"),
        ("javascript", "javascript:alert(1)"),
        ("entity_colon", "javascript&#58;alert(1)"),
        ("encoded_scheme", "java&#115;cript:alert(1)"),
        ("no_scheme", "just a plain value"),
    ];

    for (name, input) in test_cases {
        group.bench_function(name, |b| {
            b.iter(|| black_box(bad_protocol(black_box(input), &allowed)))
        });
    }

    group.finish();
}

fn bench_protocol_stacking(c: &mut Criterion) {
    let allowed = AllowedProtocols::default();
    let mut group = c.benchmark_group("protocol_stacking");

    for depth in [1usize, 4, 16, 64] {
        let input = format!("{}alert(1)", "javascript:".repeat(depth));
        group.bench_function(format!("depth_{}", depth), |b| {
            b.iter(|| black_box(bad_protocol(black_box(&input), &allowed)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_protocol_filter, bench_protocol_stacking);
criterion_main!(benches);

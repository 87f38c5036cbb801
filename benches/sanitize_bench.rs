use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tagsieve::sanitize;
use tagsieve_benches::bench_policy;

fn bench_sanitize_simple(c: &mut Criterion) {
    let policy = bench_policy();
    let test_cases = vec![
        "<script>alert('xss')</script>",
        "<img src=x onerror=alert(1)>",
        "<a href=\"javascript:alert(1)\">click</a>",
        "<a href=\"javascript:javascript:alert(1)\">stacked</a>",
        "Hello world",
        "<b>Safe content</b> with <i>formatting</i>",
        "AT&T and &quot;entities&quot; and &#65536;",
        "<a href=\"http://example.com/\">plain link</a>",
    ];

    c.bench_function("sanitize", |b| {
        b.iter(|| {
            for case in &test_cases {
                black_box(sanitize(case, &policy));
            }
        })
    });
}

fn bench_sanitize_individual(c: &mut Criterion) {
    let policy = bench_policy();
    let mut group = c.benchmark_group("sanitize_individual");

    let test_cases = vec![
        ("script_tag", "<script>alert('xss')</script>"),
        ("img_onerror", "<img src=x onerror=alert(1)>"),
        ("javascript_url", "<a href=\"javascript:alert(1)\">x</a>"),
        ("stacked_schemes", "<a href=\"javascript:javascript:alert(1)\">x</a>"),
        ("safe_text", "Hello world"),
        ("safe_html", "<b>Safe content</b>"),
        ("entities", "AT&T and &quot;entities&quot;"),
        ("malformed", "<:::> <a href=\"unterminated"),
    ];

    for (name, input) in test_cases {
        group.bench_function(name, |b| {
            b.iter(|| black_box(sanitize(black_box(input), &policy)))
        });
    }

    group.finish();
}

fn bench_sanitize_sizes(c: &mut Criterion) {
    let policy = bench_policy();
    let mut group = c.benchmark_group("sanitize_input_sizes");

    let base = "<a href=\"javascript:alert(1)\">x</a>";
    let sizes = vec![10, 50, 100, 500, 1000, 5000];

    for size in sizes {
        let mut input = base.to_string();
        while input.len() < size {
            input.push_str("<b>content</b> plain text ");
        }
        input.truncate(size);

        group.bench_function(format!("size_{}", size), |b| {
            b.iter(|| black_box(sanitize(black_box(&input), &policy)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sanitize_simple,
    bench_sanitize_individual,
    bench_sanitize_sizes
);
criterion_main!(benches);

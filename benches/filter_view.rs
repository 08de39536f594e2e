use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use keys::filtered_view;
use keys::models::Entry;
use keys::store::Database;
use keys::tui::rendering::project_session;
use keys::tui::{Input, Mode, Services, Session, Theme};

/// Generate synthetic entries with names that share common prefixes
fn generate_entries(num_entries: usize) -> Vec<Entry> {
    let prefixes = ["API", "DB", "AWS", "STRIPE", "GITHUB", "OPENAI", "REDIS", "SENTRY"];

    (0..num_entries)
        .map(|i| {
            let prefix = prefixes[i % prefixes.len()];
            Entry::new(format!("{}_KEY_{}", prefix, i), format!("secret-{}", i), 1_700_000_000)
        })
        .collect()
}

fn bench_filtered_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered_view");

    for size in [1_000, 10_000, 50_000].iter() {
        let entries = generate_entries(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| filtered_view(black_box(&entries), black_box("aws_key_1")).len());
        });
    }

    group.finish();
}

fn bench_typing_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing_query");
    let entries = generate_entries(10_000);

    group.bench_function("type_and_project_10k", |b| {
        b.iter(|| {
            let mut store = Database::open_in_memory().unwrap();
            let mut clipboard = keys::clipboard::SystemClipboard::new();
            let mut services = Services { store: &mut store, clipboard: &mut clipboard };
            let mut session = Session::new(entries.clone(), "default", Mode::search());

            for c in "stripe".chars() {
                session.handle(Input::Char(c), &mut services);
                black_box(project_session(&session, &Theme::default(), 1_700_000_000));
            }
            session.view().len()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_filtered_view, bench_typing_query);
criterion_main!(benches);

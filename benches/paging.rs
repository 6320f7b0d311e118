use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use logpager::{Anchor, LogFileParser, LogPager, ParserConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

/// Generate a log4j-style file of roughly `size_kb`, with stack traces on some errors
fn create_log_file(size_kb: usize) -> (NamedTempFile, u64) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let target_size = size_kb * 1024;
    let mut current_size = 0;
    let mut records = 0u64;

    let levels = ["DEBUG", "INFO", "INFO", "INFO", "WARN", "ERROR"];
    let loggers = ["app.auth", "app.db.Pool", "app.cache", "app.payment", "app.http"];

    while current_size < target_size {
        records += 1;
        let level = levels[rng.gen_range(0..levels.len())];
        let mut record = format!(
            "2024-09-02 {:02}:{:02}:{:02},{:03} {} [worker-{}] - {} - \
             request {} user_{} took {}ms\n",
            (records / 3600) % 24,
            (records / 60) % 60,
            records % 60,
            rng.gen_range(0..1000),
            level,
            rng.gen_range(0..16),
            loggers[rng.gen_range(0..loggers.len())],
            records,
            rng.gen_range(0..1000),
            rng.gen_range(1..5000),
        );
        if level == "ERROR" && rng.gen_bool(0.5) {
            record.push_str("java.net.SocketTimeoutException: timeout\n");
            for depth in 0..rng.gen_range(2..12) {
                let line = 10 + depth;
                record.push_str(&format!("\tat app.Handler.step{depth}(Handler.java:{line})\n"));
            }
        }
        temp_file.write_all(record.as_bytes()).unwrap();
        current_size += record.len();
    }

    temp_file.flush().unwrap();
    (temp_file, records)
}

fn size_label(size_kb: usize) -> String {
    if size_kb < 1024 {
        format!("{}KB", size_kb)
    } else {
        format!("{}MB", size_kb / 1024)
    }
}

fn bench_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("open");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));

    for &size_kb in &[500, 20000] {
        let (file, _) = create_log_file(size_kb);
        let mapped = ParserConfig::default().with_memory_threshold(0);
        let in_memory = ParserConfig::default().with_memory_threshold(u64::MAX);

        group.bench_with_input(BenchmarkId::new("in_memory", size_label(size_kb)), &file, |b, f| {
            b.iter(|| {
                black_box(
                    LogFileParser::with_config(f.path(), &in_memory)
                        .unwrap()
                        .file_size(),
                )
            });
        });
        group.bench_with_input(BenchmarkId::new("mmap", size_label(size_kb)), &file, |b, f| {
            b.iter(|| {
                black_box(
                    LogFileParser::with_config(f.path(), &mapped)
                        .unwrap()
                        .file_size(),
                )
            });
        });
    }

    group.finish();
}

fn bench_paging(c: &mut Criterion) {
    let mut group = c.benchmark_group("paging");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(3));

    for &size_kb in &[500, 20000] {
        let (file, records) = create_log_file(size_kb);
        let label = size_label(size_kb);

        // Index warm: every record start is already known
        let mut parser = LogFileParser::open(file.path()).unwrap();
        parser.locate(records);
        let mut rng = ChaCha8Rng::seed_from_u64(42); // Fixed seed for reproducibility
        group.bench_function(BenchmarkId::new("next_page_indexed", &label), |b| {
            b.iter(|| {
                let anchor = rng.gen_range(0..records.saturating_sub(50).max(1));
                black_box(parser.next_page(Anchor::Ordinal(anchor), 50).unwrap())
            });
        });

        let mut rng = ChaCha8Rng::seed_from_u64(43);
        group.bench_function(BenchmarkId::new("prev_page_indexed", &label), |b| {
            b.iter(|| {
                let anchor = rng.gen_range(50..records.max(51));
                black_box(parser.prev_page(Anchor::Ordinal(anchor), 50).unwrap())
            });
        });

        // Cold: a fresh parser has to replay up to the middle of the file
        group.bench_with_input(BenchmarkId::new("next_page_replay", &label), &file, |b, f| {
            b.iter(|| {
                let mut fresh = LogFileParser::open(f.path()).unwrap();
                black_box(fresh.next_page(Anchor::Ordinal(records / 2), 50).unwrap())
            });
        });

        group.bench_with_input(BenchmarkId::new("last_page", &label), &file, |b, f| {
            b.iter(|| {
                let mut fresh = LogFileParser::open(f.path()).unwrap();
                black_box(fresh.last_page(50).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));

    let (file, records) = create_log_file(20000);
    let mut parser = LogFileParser::open(file.path()).unwrap();
    parser.locate(records);

    let mut rng = ChaCha8Rng::seed_from_u64(44);
    group.bench_function("find_next_literal", |b| {
        b.iter(|| {
            let anchor = rng.gen_range(0..records);
            black_box(
                parser
                    .find_next("SocketTimeout", false, Anchor::Ordinal(anchor), 20)
                    .unwrap(),
            )
        });
    });

    let mut rng = ChaCha8Rng::seed_from_u64(45);
    group.bench_function("find_prev_regex", |b| {
        b.iter(|| {
            let anchor = rng.gen_range(records / 2..records);
            black_box(
                parser
                    .find_prev(r"user_99\d took", true, Anchor::Ordinal(anchor), 20)
                    .unwrap(),
            )
        });
    });

    group.bench_function("filter_next_stack_frames", |b| {
        b.iter(|| {
            black_box(
                parser
                    .filter_next("Handler.java", false, Anchor::Ordinal(0), 100)
                    .unwrap(),
            )
        });
    });

    group.bench_function("filter_prev_resume", |b| {
        b.iter(|| {
            parser.last_page(1).unwrap();
            black_box(parser.filter_prev("took 49", false, Anchor::Resume, 100).unwrap())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_open, bench_paging, bench_search);
criterion_main!(benches);

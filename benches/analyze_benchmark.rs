use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use docker_audit::analyze;

const SMALL: &str = "FROM alpine:3.19\nRUN apk add --no-cache curl\nUSER app\nHEALTHCHECK CMD true\nCMD [\"/app\"]\n";

fn large_dockerfile(stages: usize) -> String {
    let mut text = String::new();
    for i in 0..stages {
        text.push_str(&format!("FROM golang:1.22 AS stage{i}\n"));
        text.push_str("RUN apt-get update && apt-get install -y --no-install-recommends gcc make\n");
        text.push_str("COPY . /src\nRUN make -C /src build\n");
    }
    text.push_str("FROM alpine:3.19\n");
    for i in 0..stages {
        text.push_str(&format!("COPY --from=stage{i} /src/out{i} /usr/local/bin/\n"));
    }
    text.push_str("USER app\nHEALTHCHECK CMD true\nCMD [\"/usr/local/bin/app\"]\n");
    text
}

fn bench_analyze(c: &mut Criterion) {
    c.bench_function("analyze_small", |b| {
        b.iter(|| analyze(black_box(SMALL)).unwrap())
    });

    let mut group = c.benchmark_group("analyze_multistage");
    for stages in [4, 16, 64] {
        let text = large_dockerfile(stages);
        group.bench_with_input(BenchmarkId::from_parameter(stages), &text, |b, text| {
            b.iter(|| analyze(black_box(text)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);

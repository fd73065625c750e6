use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ambattery::hid::report::{decode_battery, query_buffer, REPORT_LEN};

fn benchmark_decode(c: &mut Criterion) {
    c.bench_function("decode valid response", |b| {
        let mut buffer = query_buffer();
        buffer[3] = 47;
        buffer[10] = 1;
        buffer[11] = 92;

        b.iter(|| decode_battery(black_box(&buffer)));
    });

    c.bench_function("reject stale report id", |b| {
        let buffer = [0u8; REPORT_LEN];

        b.iter(|| decode_battery(black_box(&buffer)));
    });
}

criterion_group!(benches, benchmark_decode);
criterion_main!(benches);

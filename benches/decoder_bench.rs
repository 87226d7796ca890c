//! Benchmarks for the METAR decoder.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use metar_decoder::{decoder::decode_metar, parser, tokenizer::tokenize};

/// Sample reports for benchmarking.
const SAMPLE_REPORTS: &[&str] = &[
    "METAR KJFK 121856Z 31009KT 10SM FEW250 M04/M17 A3049 RMK AO2 SLP324",
    "METAR EGLL 011250Z 24015G25KT 9999 -RA BKN012 OVC025 12/10 Q1008",
    "SPECI KORD 051753Z 36012G20KT 320V040 1 1/2SM -SN BR BKN012 OVC025 M02/M04 A2987 RMK AO2",
    "METAR LFPG 011230Z AUTO VRB03KT CAVOK 22/12 Q1021",
    "METAR KSFO 121856Z 00000KT 1/4SM FG VV002 11/11 A3001 RMK AO2",
    "METAR KDEN 121853Z 20018G32KT 10SM +TSRA SCT060CB BKN090 28/12 A3012",
];

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_metar");

    group.throughput(Throughput::Elements(1));
    group.bench_function("single", |b| {
        b.iter(|| decode_metar(black_box(SAMPLE_REPORTS[0])))
    });

    group.throughput(Throughput::Elements(SAMPLE_REPORTS.len() as u64));
    group.bench_function("batch", |b| {
        b.iter(|| {
            for report in SAMPLE_REPORTS {
                let _ = decode_metar(black_box(report));
            }
        })
    });

    group.bench_function("garbage", |b| {
        b.iter(|| decode_metar(black_box("Welcome to the weather feed, please log in")))
    });

    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    group.bench_function("example", |b| {
        b.iter(|| tokenize(black_box(SAMPLE_REPORTS[2])))
    });

    group.finish();
}

fn bench_group_parsers(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_parsers");

    group.bench_function("wind", |b| {
        b.iter(|| parser::wind(black_box("24015G25KT")))
    });

    group.bench_function("weather", |b| {
        b.iter(|| parser::weather(black_box("+TSRAGS")))
    });

    group.bench_function("cloud", |b| {
        b.iter(|| parser::cloud(black_box("SCT060CB")))
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_tokenize, bench_group_parsers);
criterion_main!(benches);

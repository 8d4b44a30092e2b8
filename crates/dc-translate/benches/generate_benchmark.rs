use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dc_translate::{generate, parse_str};
use std::fmt::Write;
use std::hint::black_box;

/// Datacard with `bins` bins, three processes and `nuisances` lnN rows.
fn make_card(bins: usize, nuisances: usize) -> String {
    let mut card = format!("imax {bins}\njmax 2\nkmax {nuisances}\n");
    card.push_str("bin");
    for b in 1..=bins {
        write!(card, " {b} {b} {b}").unwrap();
    }
    card.push_str("\nprocess");
    for _ in 0..bins {
        card.push_str(" 0 1 2");
    }
    card.push_str("\nrate");
    for b in 0..bins {
        write!(card, " {} {} {}", 1.0 + b as f64 * 0.1, 10.0, 4.5).unwrap();
    }
    card.push('\n');
    for n in 1..=nuisances {
        write!(card, "{n} lnN").unwrap();
        for b in 0..bins {
            // every other nuisance leaves the signal alone
            let sig = if n % 2 == 0 { 1.0 } else { 1.1 };
            write!(card, " {sig} {} 1.0", 1.0 + (b % 7) as f64 * 0.01).unwrap();
        }
        card.push('\n');
    }
    card
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("datacard_parse");
    for bins in [10usize, 100, 400] {
        let card = make_card(bins, 20);
        group.bench_with_input(BenchmarkId::from_parameter(bins), &card, |b, card| {
            b.iter(|| black_box(parse_str(black_box(card)).unwrap()))
        });
    }
    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("factory_generate");
    for bins in [10usize, 100, 400] {
        let model = parse_str(&make_card(bins, 20)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(bins), &model, |b, model| {
            b.iter(|| black_box(generate(black_box(model)).render()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_generate);
criterion_main!(benches);

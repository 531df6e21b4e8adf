use bracket_board::{Bracket, LayoutConfig, Match, Size};
use hdrhistogram::Histogram;
use std::time::Instant;

/// A complete five-round bracket with every result decided.
fn full_bracket() -> Vec<Match> {
    let mut matches = Vec::new();
    for (round, count) in [(1u32, 16u32), (2, 8), (3, 4), (4, 2), (5, 1)] {
        for number in 1..=count {
            let a = format!("Drink {round}-{number}a");
            matches.push(Match {
                round,
                number,
                slot_a: Some(a.clone()),
                slot_b: Some(format!("Drink {round}-{number}b")),
                winner: Some(a),
            });
        }
    }
    matches
}

fn main() {
    println!("Preparing Layout Benchmark...");

    let matches = full_bracket();
    let mut bracket = Bracket::new(LayoutConfig::default(), Size::new(1600.0, 900.0));

    let mut layout_hist = Histogram::<u64>::new_with_bounds(1, 100_000_000, 3).unwrap();
    let mut resize_hist = Histogram::<u64>::new_with_bounds(1, 100_000_000, 3).unwrap();

    const ITERATIONS: u64 = 10_000;

    println!("Running {} iterations...", ITERATIONS);

    for i in 0..ITERATIONS {
        let input = matches.clone();

        let start = Instant::now();
        bracket.load(std::hint::black_box(input), &());
        layout_hist.record(start.elapsed().as_nanos() as u64).unwrap_or(());

        // Alternate widths so every redraw moves the columns
        let width = if i % 2 == 0 { 900.0 } else { 1600.0 };
        let start = Instant::now();
        bracket.resize(Size::new(width, 900.0));
        resize_hist.record(start.elapsed().as_nanos() as u64).unwrap_or(());
    }

    report("Full layout pass (ns)", &layout_hist);
    report("Resize + link redraw (ns)", &resize_hist);

    println!(
        "\nCards: {}  Connectors: {}",
        bracket.layout().cards.len(),
        bracket.links().len()
    );
}

fn report(title: &str, histogram: &Histogram<u64>) {
    println!("\n=== {} ===", title);
    println!("Samples: {}", histogram.len());
    println!("---------------------------");
    println!("Min:    {:9} ns", histogram.min());
    println!("P50:    {:9} ns", histogram.value_at_quantile(0.50));
    println!("P90:    {:9} ns", histogram.value_at_quantile(0.90));
    println!("P99:    {:9} ns", histogram.value_at_quantile(0.99));
    println!("P99.9:  {:9} ns", histogram.value_at_quantile(0.999));
    println!("Max:    {:9} ns", histogram.max());
}

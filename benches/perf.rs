use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use ipl_terminal::match_log::Delivery;
use ipl_terminal::player_stats::{batting_summaries, bowling_summaries, process_player_stats};

// Deterministic synthetic league: 60 matches, 22 named players, ~120 balls
// per player per match side. Roughly the shape of a real season log.
fn sample_deliveries() -> Vec<Delivery> {
    let batters = [
        "V Kohli", "RG Sharma", "S Dhawan", "DA Warner", "KL Rahul", "MS Dhoni", "AB de Villiers",
        "SK Raina", "RV Uthappa", "AM Rahane", "HH Pandya",
    ];
    let bowlers = [
        "JJ Bumrah", "R Ashwin", "SP Narine", "YS Chahal", "B Kumar", "RA Jadeja", "DJ Bravo",
        "A Mishra", "UT Yadav", "Mohammed Shami", "SL Malinga",
    ];

    let mut out = Vec::new();
    let mut seed: u64 = 0x1234_5678;
    let mut next = move || {
        // xorshift keeps the data stable across runs without pulling in a
        // random number generator.
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    for match_id in 1..=60u64 {
        for ball in 1..=120u32 {
            let r = next();
            let batter = batters[(r % batters.len() as u64) as usize];
            let bowler = bowlers[((r >> 8) % bowlers.len() as u64) as usize];
            let batsman_runs = match (r >> 16) % 10 {
                0..=3 => 0,
                4..=6 => 1,
                7 => 2,
                8 => 4,
                _ => 6,
            };
            let extras = u32::from((r >> 24) % 12 == 0);
            out.push(Delivery {
                match_id,
                ball,
                batter: batter.to_string(),
                bowler: bowler.to_string(),
                batsman_runs,
                total_runs: batsman_runs + extras,
                is_wicket: (r >> 32) % 22 == 0,
            });
        }
    }
    out
}

fn bench_batting_summaries(c: &mut Criterion) {
    let deliveries = sample_deliveries();
    c.bench_function("batting_summaries", |b| {
        b.iter(|| {
            let rows = batting_summaries(black_box(&deliveries));
            black_box(rows.len());
        })
    });
}

fn bench_bowling_summaries(c: &mut Criterion) {
    let deliveries = sample_deliveries();
    c.bench_function("bowling_summaries", |b| {
        b.iter(|| {
            let rows = bowling_summaries(black_box(&deliveries));
            black_box(rows.len());
        })
    });
}

fn bench_process_player_stats(c: &mut Criterion) {
    let deliveries = sample_deliveries();
    c.bench_function("process_player_stats", |b| {
        b.iter(|| {
            let rows = process_player_stats(black_box(&deliveries));
            black_box(rows.len());
        })
    });
}

criterion_group!(
    benches,
    bench_batting_summaries,
    bench_bowling_summaries,
    bench_process_player_stats
);
criterion_main!(benches);

// Criterion benchmarks for Odds Proxy

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use odds_proxy::core::{filter_games_at, normalize_bookmakers};
use odds_proxy::models::{games_from_payload, GameList};
use serde_json::{json, Value};

const TEAMS: &[&str] = &[
    "Philadelphia Eagles",
    "Dallas Cowboys",
    "New York Jets",
    "Buffalo Bills",
    "Kansas City Chiefs",
    "Detroit Lions",
    "Green Bay Packers",
    "Chicago Bears",
];

fn create_payload(count: usize) -> Value {
    let now = Utc::now();
    let games: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("game-{}", i),
                "home_team": TEAMS[i % TEAMS.len()],
                "away_team": TEAMS[(i + 3) % TEAMS.len()],
                "commence_time": (now + Duration::hours((i % 96) as i64)).to_rfc3339(),
                "bookmakers": [{ "key": "fanduel", "markets": [{ "key": "h2h", "outcomes": [] }] }],
            })
        })
        .collect();
    Value::Array(games)
}

fn bench_normalize_bookmakers(c: &mut Criterion) {
    c.bench_function("normalize_bookmakers", |b| {
        b.iter(|| {
            normalize_bookmakers(
                black_box(Some(" DraftKings , ,FanDuel,BetMGM, caesars ")),
                black_box(None),
                black_box("draftkings,fanduel"),
            )
        })
    });
}

fn bench_filter_games(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_games");
    let now = Utc::now();

    for size in [16usize, 256, 4096] {
        let games: GameList = games_from_payload(create_payload(size));

        group.bench_with_input(BenchmarkId::new("team_and_window", size), &games, |b, games| {
            b.iter(|| filter_games_at(black_box(games.clone()), Some("eagles,bills"), Some("36"), now))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize_bookmakers, bench_filter_games);
criterion_main!(benches);

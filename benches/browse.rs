use std::time::{Duration, Instant};

use checkouts::engine::{filter, SortColumn, SortState};
use checkouts::model::{format_day, parse_day, Checkout, Owner};

const ROWS: usize = 5_000;
const ROUNDS: usize = 200;

const QUERIES: &[&str] = &["hek-6", "xrp", "05/01", "mo", "nothing-matches"];

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_latency(label: &str, latencies: &mut [Duration]) {
    latencies.sort();
    let total: Duration = latencies.iter().sum();
    let avg = total / latencies.len().max(1) as u32;
    println!("  {label}:");
    println!(
        "    n={}, avg={:.3}ms, p50={:.3}ms, p95={:.3}ms, p99={:.3}ms, max={:.3}ms",
        latencies.len(),
        avg.as_secs_f64() * 1000.0,
        percentile(latencies, 50.0).as_secs_f64() * 1000.0,
        percentile(latencies, 95.0).as_secs_f64() * 1000.0,
        percentile(latencies, 99.0).as_secs_f64() * 1000.0,
        latencies.last().copied().unwrap_or_default().as_secs_f64() * 1000.0,
    );
}

/// Deterministic spread of checkouts over 2018 with a tenth permanent.
fn generate(n: usize) -> Vec<Checkout> {
    let jan_1 = parse_day("1/1/2018").unwrap();
    let depts = ["XLM", "XRP", "BTC", "NAS", "TRX", "POE", "XMR", "NEO"];
    (0..n)
        .map(|i| {
            let start = jan_1 + chrono::Days::new((i * 7 % 365) as u64);
            let end = start + chrono::Days::new((i % 60) as u64 + 1);
            let dept = depts[i % depts.len()];
            Checkout {
                id: i as i64 + 1,
                server: "UX04".into(),
                client_code: [i % 26, i / 26 % 26]
                    .iter()
                    .map(|n| (b'A' + *n as u8) as char)
                    .collect(),
                start_date: Some(format_day(start)),
                end_date: Some(format_day(end)),
                jira: format!("HEK-{}", i % 1000),
                hd_event: format!("{}", 860_000 + i),
                notes: String::new(),
                permanent: i % 10 == 0,
                owners: vec![Owner {
                    id: i as i64 + 1,
                    first_name: format!("Owner{i}"),
                    last_name: dept.into(),
                    email: format!("owner{i}@{dept}.com"),
                    department: dept.into(),
                    primary: true,
                    alert: true,
                    checkout_id: i as i64 + 1,
                    ..Owner::default()
                }],
            }
        })
        .collect()
}

fn main() {
    let rows = generate(ROWS);
    let today = parse_day("6/15/2018").unwrap();
    println!("browse bench: {ROWS} checkouts, {ROUNDS} rounds");

    let mut filter_latencies = Vec::with_capacity(ROUNDS * QUERIES.len());
    let mut hits = 0;
    for _ in 0..ROUNDS {
        for q in QUERIES {
            let t = Instant::now();
            hits += filter(&rows, q).len();
            filter_latencies.push(t.elapsed());
        }
    }
    print_latency("filter", &mut filter_latencies);
    println!("    total hits: {hits}");

    for column in SortColumn::ALL {
        let mut latencies = Vec::with_capacity(ROUNDS);
        let mut state = SortState::new();
        let mut view = rows.clone();
        for _ in 0..ROUNDS {
            let t = Instant::now();
            state.sort(&mut view, column, today);
            latencies.push(t.elapsed());
        }
        print_latency(&format!("sort {}", column.key()), &mut latencies);
    }
}

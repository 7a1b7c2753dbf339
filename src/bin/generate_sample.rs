use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

const HEADER: [&str; 6] = [
    "Name",
    "TA Team",
    "Security status\nAccepted / Not Accepted",
    "Sector/Bank/Club/Company",
    "Security date",
    "Duration",
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let teams = ["Alice", "Bob", "Carla", "Dmitri", "Esra"];
    let sectors = ["Bank", "Club", "Company", "Insurance", "Retail"];
    let first_names = ["Amir", "Bea", "Chen", "Dana", "Eli", "Femi", "Gita", "Hugo"];
    // Roughly 7 in 10 accepted, the rest split between rejection and limbo.
    let statuses = [
        "Accepted", "Accepted", "Accepted", "Accepted", "Accepted", "Accepted", "Accepted",
        "Not Accepted", "Not Accepted", "Pending",
    ];

    // Dates straddle the cutoff so the filter has something to drop.
    let start = NaiveDate::from_ymd_opt(2022, 10, 1).context("start date")?;
    let output_path = "sample_security.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    let rows = 400;
    for i in 0..rows {
        let status = rng.pick(&statuses);
        let date = start + Duration::days(rng.below(540) as i64);
        // Only accepted candidates have a measured duration, and not all of them.
        let duration = if status == "Accepted" && rng.next_f64() > 0.15 {
            format!("{:.0}", 3.0 + rng.next_f64() * 40.0)
        } else {
            String::new()
        };

        writer.write_record([
            format!("{} {i:03}", rng.pick(&first_names)),
            rng.pick(&teams).to_string(),
            status.to_string(),
            rng.pick(&sectors).to_string(),
            date.format("%Y-%m-%d 00:00:00").to_string(),
            duration,
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} candidate records to {output_path}");
    Ok(())
}

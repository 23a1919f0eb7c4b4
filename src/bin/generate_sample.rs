use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Row<'a> {
    university: &'a str,
    province: &'a str,
    year: i32,
    #[serde(rename = "EmploymentRate6Months")]
    employment_rate_6_months: f64,
    grad_satisfaction: f64,
    employer_satisfaction: f64,
    graduation_rate: f64,
}

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

    /// Uniform in `[-spread, spread]`.
    fn jitter(&mut self, spread: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * spread
    }
}

/// Keep a percentage inside `[0, 100]` with one decimal.
fn pct(v: f64) -> f64 {
    (v.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

const UNIVERSITIES: [(&str, &str); 12] = [
    ("University of Alberta", "AB"),
    ("University of Calgary", "AB"),
    ("University of British Columbia", "BC"),
    ("Simon Fraser University", "BC"),
    ("University of Manitoba", "MB"),
    ("Dalhousie University", "NS"),
    ("McMaster University", "ON"),
    ("Queen's University", "ON"),
    ("University of Toronto", "ON"),
    ("University of Waterloo", "ON"),
    ("McGill University", "QC"),
    ("University of Saskatchewan", "SK"),
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "combined_kpi_data.csv";

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut rows = 0usize;
    for (university, province) in UNIVERSITIES {
        // Per-university baselines so lines are distinguishable.
        let employment = 86.0 + rng.jitter(6.0);
        let satisfaction = 88.0 + rng.jitter(5.0);
        let employer = 90.0 + rng.jitter(4.0);
        let graduation = 75.0 + rng.jitter(10.0);

        for year in 2015..=2023 {
            let t = f64::from(year - 2015);
            writer
                .serialize(Row {
                    university,
                    province,
                    year,
                    employment_rate_6_months: pct(employment + 0.3 * t + rng.jitter(1.5)),
                    grad_satisfaction: pct(satisfaction + rng.jitter(1.5)),
                    employer_satisfaction: pct(employer - 0.1 * t + rng.jitter(1.0)),
                    graduation_rate: pct(graduation + 0.4 * t + rng.jitter(1.0)),
                })
                .with_context(|| format!("writing {university} {year}"))?;
            rows += 1;
        }
    }

    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {rows} KPI rows for {} universities to {output_path}",
        UNIVERSITIES.len()
    );
    Ok(())
}

//! Writes a deterministic, intentionally messy sample defect sheet to
//! `sample_defects.csv`: padded whitespace, unit-suffixed TAT values,
//! mixed week formats, and blank cells — the shapes the normalizer has to
//! cope with in real uploads.

use anyhow::{Context, Result};

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let families = ["Inverter", "Charger", "Controller", "Telemetry Unit"];
    let assemblies = [
        "Main Board", "PSU", "Display", "Harness", "Enclosure", "Backplane",
    ];
    let stages = ["Incoming", "In-Process", "Final Test", "Field Return"];
    let problems = [
        "Solder bridge",
        "Missing component",
        "Cold joint",
        "Firmware fault",
        "Connector damage",
        "Calibration drift",
    ];
    let functionalities = ["Power", "Communication", "Sensing", "Mechanical"];
    let responsibles = ["SMT Line", "Assembly Line", "Supplier", "Design", "Unknown"];
    let root_causes = [
        "Process deviation",
        "Component defect",
        "Handling damage",
        "Design margin",
        "Under analysis",
    ];
    let submitters = ["akumar", "lchen", "mgarcia", "tnguyen"];

    let output_path = "sample_defects.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record([
        "Week",
        "Product Family",
        "Assembly",
        "Detection Stage",
        "Problem Observed",
        "Functionality",
        "Responsible",
        "Problem Analysis",
        "TAT",
        "Submitted By",
    ])?;

    let mut rows = 0usize;
    for _ in 0..200 {
        let week = 1 + (rng.next_u64() % 12);
        // Mix the week formats seen in real sheets.
        let week_cell = match rng.next_u64() % 3 {
            0 => format!("WK{week:02}"),
            1 => format!("Week {week}"),
            _ => week.to_string(),
        };

        let tat = 1.0 + rng.next_f64() * 14.0;
        let tat_cell = match rng.next_u64() % 5 {
            0 => format!("{tat:.1} days"),
            1 => format!("  {tat:.1} "),
            2 if rng.next_f64() < 0.5 => String::new(), // missing TAT
            _ => format!("{tat:.1}"),
        };

        let family_cell = format!(" {} ", rng.pick(&families)); // padded on purpose
        writer.write_record([
            week_cell.as_str(),
            family_cell.as_str(),
            rng.pick(&assemblies),
            rng.pick(&stages),
            rng.pick(&problems),
            rng.pick(&functionalities),
            rng.pick(&responsibles),
            rng.pick(&root_causes),
            tat_cell.as_str(),
            rng.pick(&submitters),
        ])?;
        rows += 1;
    }

    // A couple of all-blank rows the cleaner must drop.
    for _ in 0..2 {
        writer.write_record(["", "", "", "", "", "", "", "", "", ""])?;
    }

    writer.flush()?;
    println!("Wrote {rows} defect rows (plus 2 blank) to {output_path}");
    Ok(())
}

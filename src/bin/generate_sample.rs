//! Writes a synthetic Bloodhound export with the defects real exports have:
//! a header, blank lines, repeated depths and skipped depths.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "Write a synthetic Bloodhound export for manual cleanup runs")]
struct Args {
    /// File to write
    #[arg(default_value = "sample_export.xls")]
    output: PathBuf,

    /// First depth logged
    #[arg(long, default_value_t = 3900, allow_negative_numbers = true)]
    first_depth: i64,

    /// Last depth logged
    #[arg(long, default_value_t = 7600, allow_negative_numbers = true)]
    last_depth: i64,
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

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const HEADER: &str =
    "Depth\tROP\tTG\tC1\tC2\tC3\tiC4\tnC4\tiC5\tnC5\tC4\tCO2\tGamma\tLag";

/// Gas channels follow a slow drift with noise; gamma swings between shale
/// and sand baselines.
fn write_row<W: Write>(out: &mut W, depth: i64, rng: &mut SimpleRng) -> std::io::Result<()> {
    let background = 20.0 + 10.0 * ((depth as f64) / 150.0).sin();
    let tg = background + rng.range(-2.0, 2.0);
    let c1 = tg * 0.6 + rng.range(0.0, 1.0);
    let c2 = tg * 0.2 + rng.range(0.0, 0.5);
    let c3 = tg * 0.1 + rng.range(0.0, 0.25);
    let ic4 = c3 * 0.3;
    let nc4 = c3 * 0.4;
    let c4 = ic4 + nc4;
    let baseline = if (depth / 60) % 2 == 0 { 95.0 } else { 40.0 };
    let gamma = baseline + rng.range(-5.0, 5.0);
    let rop = rng.range(20.0, 120.0);
    writeln!(
        out,
        "{depth}\t{rop:.1}\t{tg:.2}\t{c1:.2}\t{c2:.2}\t{c3:.2}\t{ic4:.2}\t{nc4:.2}\t\
         0.00\t0.00\t{c4:.2}\t0.00\t{gamma:.1}\t{lag:.1}",
        lag = depth as f64 / 80.0,
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    let output_path = args.output.display().to_string();
    let (first, last) = (args.first_depth, args.last_depth);

    let mut rng = SimpleRng::new(42);
    let file =
        File::create(&args.output).with_context(|| format!("creating {output_path}"))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "Bloodhound Gas Detector Export")?;
    writeln!(out)?;
    writeln!(out, "{HEADER}")?;

    let mut rows = 0usize;
    let mut duplicates = 0usize;
    let mut skipped = 0usize;
    let mut depth = first;
    while depth <= last {
        write_row(&mut out, depth, &mut rng)?;
        rows += 1;

        // Bit sat on bottom: same depth logged again
        if rng.chance(0.03) {
            write_row(&mut out, depth, &mut rng)?;
            rows += 1;
            duplicates += 1;
        }

        // Logger dropped a few feet
        if rng.chance(0.02) {
            let gap = 1 + (rng.next_u64() % 4) as i64;
            depth += gap;
            skipped += gap as usize;
        }
        depth += 1;
    }
    writeln!(out)?;
    writeln!(out, "End of export")?;
    out.flush().context("writing sample export")?;

    println!(
        "Wrote {rows} rows ({duplicates} repeated depths, {skipped} skipped depths) to {output_path}"
    );
    Ok(())
}

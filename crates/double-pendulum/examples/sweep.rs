//! Records the standard set of double pendulum runs to text files.
//!
//! Each preset starts a 1 m, 50 g pendulum from rest at a pair of angles and
//! records 30 seconds of motion at 1 ms intervals. The runs range from gentle
//! swinging at 10° to the chaotic regime near the inverted position.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --example sweep
//! cargo run --release --example sweep -- out/
//! RUST_LOG=debug cargo run --release --example sweep
//! ```
//!
//! Files are written to the given directory (default: the current one) as
//! `double_pendulum_<name>.csv`.

use std::{error::Error, path::PathBuf, time::Instant};

use double_pendulum::Simulation;

const LENGTH: f32 = 1.0;
const MASS: f32 = 0.05;
const REPORT_INTERVAL: f64 = 0.001;
const DURATION: f64 = 30.0;

/// File suffix and initial `(θ1, θ2)` in radians.
const PRESETS: [(&str, f32, f32); 6] = [
    ("10", 0.174_532_9, 0.174_532_9),
    ("30", 0.523_598_8, 0.523_598_8),
    ("60", 1.570_796_3, 1.047_197_6),
    ("90", 1.570_796_3, 1.570_796_3),
    ("179", 3.124_139_4, 3.124_139_4),
    ("179_1", 3.125_884_7, 3.125_884_7),
];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("."), PathBuf::from);

    for (name, theta1, theta2) in PRESETS {
        let path = dir.join(format!("double_pendulum_{name}.csv"));
        let mut sim = Simulation::new(
            f64::from(LENGTH),
            f64::from(MASS),
            f64::from(theta1),
            f64::from(theta2),
        )?;

        let start = Instant::now();
        let recording = sim.record_to_file(REPORT_INTERVAL, DURATION, &path)?;

        println!(
            "{}: {} records, {} steps ({} rejected) in {:.2?}",
            path.display(),
            recording.records,
            recording.stats.accepted,
            recording.stats.rejected,
            start.elapsed()
        );
    }

    Ok(())
}

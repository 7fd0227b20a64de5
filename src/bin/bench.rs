//! Benchmark for the full-size solve.
//!
//! Run with: cargo run --release --bin bench

use std::time::{Duration, Instant};

use roster_scheduling::demo_data::{self, DemoData};
use roster_scheduling::domain::Role;
use roster_scheduling::{generate_schedule, SolverOptions};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("roster_scheduling=debug")
        .init();

    let request = demo_data::generate(DemoData::Full);
    let num_days = 30;
    let num_personnel = request.personnel.len();

    println!("Benchmark: full-month roster solve");
    println!("  Month: {}", request.config.month);
    println!("  Personnel: {num_personnel}");
    println!("  Decision variables: {}", num_personnel * num_days * 4 + 2);
    println!();

    let options = SolverOptions {
        time_limit: Duration::from_secs(300),
    };
    let started = Instant::now();
    match generate_schedule(&request, &options) {
        Ok(schedule) => {
            let loads: Vec<usize> = request
                .personnel
                .iter()
                .map(|p| schedule.load_of(p.id as u32))
                .collect();
            let shift_loads: Vec<usize> = request
                .personnel
                .iter()
                .zip(&loads)
                .filter(|(p, _)| p.role == Role::Shift)
                .map(|(_, &load)| load)
                .collect();
            let max = shift_loads.iter().max().copied().unwrap_or(0);
            let min = shift_loads.iter().min().copied().unwrap_or(0);

            println!("Results:");
            println!("  Time: {:.2?}", started.elapsed());
            println!("  Days scheduled: {}", schedule.num_days());
            println!("  Loads: {loads:?}");
            println!("  Shift-role spread (max - min): {}", max.saturating_sub(min));
        }
        Err(err) => {
            println!("Solve failed after {:.2?}: {err}", started.elapsed());
        }
    }
}

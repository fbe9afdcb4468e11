//! Ranking, verification and output of benchmark outcomes.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use crate::harness::Outcome;

/// Sum of ages 0..=99, one full cycle of generated users.
pub const CYCLE_SUM: u64 = 4950;

/// Closed-form sum of `i mod 100` for `i` in `0..users`.
pub fn expected_sum(users: usize) -> u64 {
    let cycles = (users / 100) as u64;
    let rest = (users % 100) as u64;
    cycles * CYCLE_SUM + rest * rest.saturating_sub(1) / 2
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ranked {
    pub outcome: Outcome,
    /// Fastest time divided by this outcome's time.
    pub speedup: f64,
}

#[derive(Clone, Debug)]
pub struct Report {
    pub users: usize,
    pub expected: u64,
    /// Fastest first. Equal times keep their input order.
    pub ranked: Vec<Ranked>,
}

impl Report {
    pub fn new(mut outcomes: Vec<Outcome>, users: usize) -> Self {
        outcomes.sort_by(|a, b| a.elapsed_ms.total_cmp(&b.elapsed_ms));
        let fastest = outcomes.first().map(|o| o.elapsed_ms).unwrap_or(0.0);

        let ranked = outcomes
            .into_iter()
            .map(|outcome| {
                let speedup = if outcome.elapsed_ms > 0.0 {
                    fastest / outcome.elapsed_ms
                } else {
                    1.0
                };
                Ranked { outcome, speedup }
            })
            .collect();

        Self {
            users,
            expected: expected_sum(users),
            ranked,
        }
    }

    /// True when every outcome produced the closed-form sum.
    pub fn verified(&self) -> bool {
        self.ranked.iter().all(|r| r.outcome.result == self.expected)
    }

    pub fn distinct_results(&self) -> BTreeSet<u64> {
        self.ranked.iter().map(|r| r.outcome.result).collect()
    }

    pub fn best(&self) -> Option<&Ranked> {
        self.ranked.first()
    }

    /// Users processed per second by the fastest strategy.
    pub fn elements_per_second(&self) -> f64 {
        match self.best() {
            Some(best) if best.outcome.elapsed_ms > 0.0 => {
                self.users as f64 / (best.outcome.elapsed_ms / 1000.0)
            }
            _ => 0.0,
        }
    }
}

/// Host description for the results file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemInfo {
    pub version: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
    pub cpus: usize,
}

impl SystemInfo {
    pub fn detect(cpus: usize) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            cpus,
        }
    }
}

fn format_set(values: &BTreeSet<u64>) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("{{{}}}", parts.join(", "))
}

/// Print the ranked table and verification verdict to stdout.
pub fn print_report(report: &Report) {
    let name_w = 20;

    println!();
    println!("RESULTS:");
    println!("{}", "-".repeat(name_w + 30));
    for (i, r) in report.ranked.iter().enumerate() {
        println!(
            "{:>2}. {:<name_w$} {:>10.3}ms ({:.1}x)",
            i + 1,
            format!("{}:", r.outcome.name),
            r.outcome.elapsed_ms,
            r.speedup,
            name_w = name_w
        );
    }
    println!();

    if report.verified() {
        println!("✓ Verification: all results match");
    } else {
        println!("✗ Verification: results do not match");
    }
    println!("  Expected sum: {}", report.expected);
    println!("  Actual results: {}", format_set(&report.distinct_results()));
    println!();

    if let Some(best) = report.best() {
        println!("Best: {}", best.outcome.name);
        println!("  Time: {:.3}ms", best.outcome.elapsed_ms);
        println!("  Elements per second: {:.0}", report.elements_per_second());
        println!();
    }
}

/// Plain-text summary written to the results file.
pub fn render_results(report: &Report, system: &SystemInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SoA column sum benchmark results");
    let _ = writeln!(out);
    let _ = writeln!(out, "System: {}/{}", system.os, system.arch);
    let _ = writeln!(out, "soa-bench: {}", system.version);
    let _ = writeln!(out, "CPU Cores: {}", system.cpus);
    let _ = writeln!(out, "Elements: {}", report.users);
    let _ = writeln!(out);

    for r in &report.ranked {
        let _ = writeln!(
            out,
            "{}: {:.3}ms (result: {})",
            r.outcome.name, r.outcome.elapsed_ms, r.outcome.result
        );
    }

    if let Some(best) = report.best() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Best: {} - {:.3}ms", best.outcome.name, best.outcome.elapsed_ms);
    }
    out
}

pub fn write_results(path: &Path, report: &Report, system: &SystemInfo) -> io::Result<()> {
    fs::write(path, render_results(report, system))
}

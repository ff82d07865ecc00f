/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt::Write as _;
use std::path::Path;
use std::time::{Duration, Instant};

/// Records the duration of consecutive build steps.
pub struct StopWatch {
    last_instant: Instant,
    metrics: Vec<Metric>,
    lwidth: usize,
}

impl StopWatch {
    pub fn start() -> Self {
        Self {
            last_instant: Instant::now(),
            metrics: vec![],
            lwidth: 0,
        }
    }

    /// Closes the current step under the name `what` and starts the next one.
    pub fn record(&mut self, what: &'static str) {
        let now = Instant::now();
        let duration = now - self.last_instant;
        self.last_instant = now;
        self.lwidth = usize::max(self.lwidth, what.len());
        self.metrics.push(Metric { name: what, duration });
    }

    pub fn steps(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.metrics.iter().map(|m| m.name)
    }

    /// Renders one line per step plus a total.
    pub fn report(&self) -> String {
        let total: Duration = self.metrics.iter().map(|m| m.duration).sum();
        let rwidth = log10(total.as_millis());

        let mut out = String::new();
        for metric in self.metrics.iter() {
            Self::write_metric(&mut out, metric.name, metric.duration, self.lwidth, rwidth);
        }
        let _ = writeln!(out, "{}", "-".repeat(self.lwidth + rwidth + 5));
        Self::write_metric(&mut out, "total", total, self.lwidth, rwidth);
        out
    }

    pub fn write_stats_to(&self, to_file: &Path) {
        std::fs::write(to_file, self.report())
            .unwrap_or_else(|e| panic!("failed to write stats file {}: {e}", to_file.display()));
    }

    fn write_metric(out: &mut String, name: &str, duration: Duration, lwidth: usize, rwidth: usize) {
        let _ = writeln!(
            out,
            "{: >l$}: {: >r$} ms",
            name,
            duration.as_millis(),
            l = lwidth,
            r = rwidth,
        );
    }
}

fn log10(n: u128) -> usize {
    std::iter::successors(Some(n), |&n| (n >= 10).then_some(n / 10)).count()
}

struct Metric {
    name: &'static str,
    duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_steps_and_total() {
        let mut watch = StopWatch::start();
        watch.record("load_json");
        watch.record("generate");

        assert_eq!(watch.steps().collect::<Vec<_>>(), ["load_json", "generate"]);

        let report = watch.report();
        assert!(report.contains("load_json:"));
        assert!(report.contains("generate:"));
        assert!(report.lines().last().unwrap().trim_start().starts_with("total:"));
    }
}

//! Runs every method of a family on the same problem and ranks them.
//!
//! Runs are independent, so they are executed on the rayon thread pool. Each run receives its
//! own copy of the mutable inputs. A method that cannot be applied to the problem (a missing
//! initial point, no relaxation factor for SOR, too few points for a cubic spline) appears in the
//! report as a failed entry carrying the validation message.
use crate::Utils::logger::{TraceTable, format_value};
use crate::numerical::convergence::{FailureKind, RunOutcome};
use crate::numerical::interpolation::{InterpolationMethod, interpolate};
use crate::numerical::iterative_linear::{LinearMethod, LinearSystemInput, solve_linear_system};
use crate::numerical::root_finding::{
    RootFindingConfig, RootFindingInput, RootFindingMethod, ScalarRootFinder,
};
use log::info;
use rayon::prelude::*;
use std::fmt;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemFamily {
    RootFinding,
    Linear,
    Interpolation,
}

impl fmt::Display for ProblemFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProblemFamily::RootFinding => write!(f, "root finding"),
            ProblemFamily::Linear => write!(f, "iterative linear solvers"),
            ProblemFamily::Interpolation => write!(f, "interpolation"),
        }
    }
}

/// One line of a comparison report
#[derive(Debug, Clone, PartialEq)]
pub struct MethodReport {
    pub method: String,
    pub success: bool,
    pub outcome: String,
    pub iterations: Option<usize>,
    pub final_error: Option<f64>,
    pub spectral_radius: Option<f64>,
    pub elapsed: Duration,
    pub message: String,
    /// why the run failed, None for successful runs and for plain non-convergence
    pub failure: Option<FailureKind>,
}

impl MethodReport {
    fn rejected(method: String, kind: FailureKind, message: String, elapsed: Duration) -> Self {
        Self {
            method,
            success: false,
            outcome: "rejected".to_string(),
            iterations: None,
            final_error: None,
            spectral_radius: None,
            elapsed,
            message,
            failure: Some(kind),
        }
    }
}

fn outcome_label(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Converged => "converged".to_string(),
        RunOutcome::MaxIterationsReached => "max iterations".to_string(),
        RunOutcome::Breakdown(breakdown) => format!("breakdown at iteration {}", breakdown.iteration()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub family: ProblemFamily,
    pub entries: Vec<MethodReport>,
    /// index into `entries`
    pub best: Option<usize>,
}

impl ComparisonReport {
    pub fn best_method(&self) -> Option<&MethodReport> {
        self.best.map(|i| &self.entries[i])
    }

    pub fn successful(&self) -> impl Iterator<Item = &MethodReport> {
        self.entries.iter().filter(|entry| entry.success)
    }
}

impl TraceTable for ComparisonReport {
    fn headers(&self) -> Vec<String> {
        let mut headers = vec!["method", "success", "outcome", "iterations", "final error"];
        if self.family == ProblemFamily::Linear {
            headers.push("spectral radius");
        }
        headers.extend(["time, us", "message"]);
        headers.into_iter().map(String::from).collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .map(|entry| {
                let mut row = vec![
                    entry.method.clone(),
                    if entry.success { "yes" } else { "no" }.to_string(),
                    entry.outcome.clone(),
                    entry
                        .iterations
                        .map_or_else(|| "-".to_string(), |n| n.to_string()),
                    entry
                        .final_error
                        .map_or_else(|| "n/a".to_string(), |e| format!("{:.3e}", e)),
                ];
                if self.family == ProblemFamily::Linear {
                    row.push(entry.spectral_radius.map_or_else(|| "-".to_string(), format_value));
                }
                row.push(entry.elapsed.as_micros().to_string());
                row.push(entry.message.clone());
                row
            })
            .collect()
    }

    fn summary(&self) -> String {
        match self.best_method() {
            Some(best) => format!("{}: best method is {}", self.family, best.method),
            None => format!("{}: no method succeeded", self.family),
        }
    }
}

/// index of the entry with the fewest iterations among those accepted by `eligible`;
/// ties go to the first such entry
fn fewest_iterations(entries: &[MethodReport], eligible: impl Fn(&MethodReport) -> bool) -> Option<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| eligible(entry))
        .min_by_key(|(i, entry)| (entry.iterations.unwrap_or(usize::MAX), *i))
        .map(|(i, _)| i)
}

pub fn compare_root_finding(config: &RootFindingConfig, input: &RootFindingInput) -> ComparisonReport {
    let methods: Vec<RootFindingMethod> = RootFindingMethod::iter().collect();
    let entries: Vec<MethodReport> = methods
        .par_iter()
        .map(|method| {
            let solver = ScalarRootFinder::with_config(*config);
            let input = *input;
            let start = Instant::now();
            let run = solver.solve_with_method(*method, &input);
            let elapsed = start.elapsed();
            match run {
                Ok(result) => MethodReport {
                    method: method.to_string(),
                    success: result.converged,
                    outcome: outcome_label(&result.outcome),
                    iterations: Some(result.iteration_count()),
                    final_error: result.final_error(),
                    spectral_radius: None,
                    elapsed,
                    failure: result.outcome.failure_kind(),
                    message: result.message,
                },
                Err(err) => MethodReport::rejected(method.to_string(), err.kind(), err.to_string(), elapsed),
            }
        })
        .collect();
    let best = fewest_iterations(&entries, |entry| entry.success);
    finish(ProblemFamily::RootFinding, entries, best)
}

pub fn compare_linear(input: &LinearSystemInput) -> ComparisonReport {
    let methods: Vec<LinearMethod> = LinearMethod::iter().collect();
    let entries: Vec<MethodReport> = methods
        .par_iter()
        .map(|method| {
            let input = input.clone();
            let start = Instant::now();
            let run = solve_linear_system(*method, &input);
            let elapsed = start.elapsed();
            match run {
                Ok(result) => MethodReport {
                    method: method.to_string(),
                    success: result.converged,
                    outcome: outcome_label(&result.outcome),
                    iterations: Some(result.iteration_count()),
                    final_error: result.final_error(),
                    spectral_radius: Some(result.spectral_radius),
                    elapsed,
                    failure: result.outcome.failure_kind(),
                    message: result.message,
                },
                Err(err) => MethodReport::rejected(method.to_string(), err.kind(), err.to_string(), elapsed),
            }
        })
        .collect();
    let best = fewest_iterations(&entries, |entry| {
        entry.success && entry.spectral_radius.is_some_and(|rho| rho < 1.0)
    });
    finish(ProblemFamily::Linear, entries, best)
}

pub fn compare_interpolation(x: &[f64], y: &[f64]) -> ComparisonReport {
    let methods: Vec<InterpolationMethod> = InterpolationMethod::iter().collect();
    let entries: Vec<MethodReport> = methods
        .par_iter()
        .map(|method| {
            let (x, y) = (x.to_vec(), y.to_vec());
            let start = Instant::now();
            let run = interpolate(*method, &x, &y);
            let elapsed = start.elapsed();
            match run {
                Ok(result) => MethodReport {
                    method: method.to_string(),
                    success: true,
                    outcome: "built".to_string(),
                    iterations: None,
                    final_error: None,
                    spectral_radius: None,
                    elapsed,
                    failure: None,
                    message: match &result.warning {
                        Some(warning) => format!("{} (warning: {})", result.polynomial_string, warning),
                        None => result.polynomial_string,
                    },
                },
                Err(err) => MethodReport::rejected(method.to_string(), err.kind(), err.to_string(), elapsed),
            }
        })
        .collect();
    let best = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.success)
        .min_by_key(|(i, entry)| (entry.elapsed, *i))
        .map(|(i, _)| i);
    finish(ProblemFamily::Interpolation, entries, best)
}

fn finish(family: ProblemFamily, entries: Vec<MethodReport>, best: Option<usize>) -> ComparisonReport {
    let report = ComparisonReport {
        family,
        entries,
        best,
    };
    info!(
        "{} comparison: {} of {} methods succeeded",
        family,
        report.successful().count(),
        report.entries.len()
    );
    report
}

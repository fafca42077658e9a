//! # Method lab
//!
//! Entry point that turns a task document into runs. Every section title is a method identifier
//! (or `compare_root_finding`, `compare_linear`, `compare_interpolation`), the keys of the section
//! are the inputs of that method. An optional `settings` section configures logging and csv export.
//!
//! # Examples
//! ```
//! use methodlab::numerical::method_lab::{MethodLab, MethodOutput};
//! let task = r#"
//! newton
//!     function: "x^3 - 2*x - 5"
//!     x0: 2.5
//!     tolerance: 1e-10
//!     max_iterations: 50
//! "#;
//! let lab = MethodLab::from_str(task).unwrap();
//! let runs = lab.run_all();
//! match &runs[0].1 {
//!     Ok(MethodOutput::RootFinding(result)) => {
//!         assert!((result.root.unwrap() - 2.0945514815).abs() < 1e-9)
//!     }
//!     _ => panic!("newton run failed"),
//! }
//! ```
use crate::Utils::logger::{LoggerError, TraceTable, init_logger, save_trace_to_csv};
use crate::Utils::task_parser::{Section, TaskDocument, TaskError, parse_task_document, parse_task_file};
use crate::numerical::comparison_report::{
    ComparisonReport, ProblemFamily, compare_interpolation, compare_linear, compare_root_finding,
};
use crate::numerical::convergence::{ErrorKind, FailureKind};
use crate::numerical::interpolation::{
    InterpolationError, InterpolationMethod, InterpolationResult, interpolate,
};
use crate::numerical::iterative_linear::{
    LinearMethod, LinearSolverError, LinearSystemInput, LinearSystemResult, NormType,
    solve_linear_system,
};
use crate::numerical::numeric_function::{NumericFunction, SymbolicFunction};
use crate::numerical::root_finding::{
    RootFindingConfig, RootFindingError, RootFindingInput, RootFindingMethod, RootFindingResult,
    ScalarRootFinder,
};
use crate::symbolic::parse_expr::ParseError;
use log::{error, info};
use nalgebra::{DMatrix, DVector};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// title of the section holding run settings
pub const SETTINGS_SECTION: &str = "settings";
/// relaxation factor of SOR inside `compare_linear` when the task gives none
pub const DEFAULT_COMPARISON_RELAXATION: f64 = 1.2;

#[derive(Debug, Error)]
pub enum MethodLabError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("cannot parse expression: {0}")]
    Expression(#[from] ParseError),
    #[error(transparent)]
    RootFinding(#[from] RootFindingError),
    #[error(transparent)]
    Linear(#[from] LinearSolverError),
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
    #[error(transparent)]
    Logger(#[from] LoggerError),
    #[error("cannot write trace: {0}")]
    Export(#[from] csv::Error),
}

impl MethodLabError {
    pub fn kind(&self) -> FailureKind {
        match self {
            MethodLabError::RootFinding(e) => e.kind(),
            MethodLabError::Linear(e) => e.kind(),
            MethodLabError::Interpolation(e) => e.kind(),
            MethodLabError::Task(e) => e.kind(),
            MethodLabError::Expression(_)
            | MethodLabError::Logger(_)
            | MethodLabError::Export(_) => FailureKind::InputValidation,
        }
    }
}

/// What a section title asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    RootFinding(RootFindingMethod),
    Linear(LinearMethod),
    Interpolation(InterpolationMethod),
    Compare(ProblemFamily),
}

impl MethodKind {
    /// Resolves a section title. The family tables are consulted in a fixed order, so `newton`
    /// is Newton-Raphson and Newton interpolation is `newton_interpolation`.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let lowered = identifier.trim().to_lowercase();
        match lowered.as_str() {
            "compare_root_finding" => return Some(MethodKind::Compare(ProblemFamily::RootFinding)),
            "compare_linear" => return Some(MethodKind::Compare(ProblemFamily::Linear)),
            "compare_interpolation" => {
                return Some(MethodKind::Compare(ProblemFamily::Interpolation));
            }
            _ => {}
        }
        RootFindingMethod::from_identifier(identifier)
            .map(MethodKind::RootFinding)
            .or_else(|| LinearMethod::from_identifier(identifier).map(MethodKind::Linear))
            .or_else(|| {
                InterpolationMethod::from_identifier(identifier).map(MethodKind::Interpolation)
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MethodOutput {
    RootFinding(RootFindingResult),
    Linear(LinearSystemResult),
    Interpolation(InterpolationResult),
    Comparison(ComparisonReport),
}

impl MethodOutput {
    pub fn trace(&self) -> &dyn TraceTable {
        match self {
            MethodOutput::RootFinding(result) => result,
            MethodOutput::Linear(result) => result,
            MethodOutput::Interpolation(result) => result,
            MethodOutput::Comparison(report) => report,
        }
    }

    pub fn to_table(&self) -> String {
        self.trace().to_table()
    }
}

/// Contents of the `settings` section
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabSettings {
    pub loglevel: Option<String>,
    pub log_to_file: bool,
    pub csv_output: Option<PathBuf>,
}

impl LabSettings {
    pub fn from_section(section: &Section) -> Result<Self, TaskError> {
        Ok(Self {
            loglevel: section.text("loglevel")?,
            log_to_file: section.bool("log_to_file")?.unwrap_or(false),
            csv_output: section.text("csv_output")?.map(PathBuf::from),
        })
    }
}

/// A parsed task document ready to run
#[derive(Debug, Clone)]
pub struct MethodLab {
    document: TaskDocument,
    settings: LabSettings,
}

impl MethodLab {
    pub fn new(document: TaskDocument) -> Result<Self, MethodLabError> {
        let settings = match document.section(SETTINGS_SECTION) {
            Some(section) => LabSettings::from_section(section)?,
            None => LabSettings::default(),
        };
        Ok(Self { document, settings })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self, MethodLabError> {
        Self::new(parse_task_document(text)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MethodLabError> {
        Self::new(parse_task_file(path)?)
    }

    pub fn settings(&self) -> &LabSettings {
        &self.settings
    }

    pub fn document(&self) -> &TaskDocument {
        &self.document
    }

    /// Installs the logger described by the settings section.
    pub fn init_logging(&self) -> Result<bool, MethodLabError> {
        Ok(init_logger(
            self.settings.loglevel.as_deref(),
            self.settings.log_to_file,
        )?)
    }

    fn runnable_sections(&self) -> impl Iterator<Item = &Section> {
        self.document
            .sections
            .iter()
            .filter(|section| section.title != SETTINGS_SECTION)
    }

    /// Runs every section in document order. A failing section does not stop the others.
    /// When `csv_output` is set each successful trace is written to it (with the section
    /// number appended to the file stem when the document has several sections).
    pub fn run_all(&self) -> Vec<(String, Result<MethodOutput, MethodLabError>)> {
        let count = self.runnable_sections().count();
        self.runnable_sections()
            .enumerate()
            .map(|(index, section)| {
                let run = run_section(section).and_then(|output| {
                    if let Some(path) = &self.settings.csv_output {
                        let path = numbered_path(path, index + 1, count);
                        save_trace_to_csv(output.trace(), &path)?;
                        info!("trace of '{}' written to {}", section.title, path.display());
                    }
                    Ok(output)
                });
                if let Err(e) = &run {
                    error!("section '{}' failed: {}", section.title, e);
                }
                (section.title.clone(), run)
            })
            .collect()
    }
}

fn numbered_path(path: &Path, number: usize, count: usize) -> PathBuf {
    if count <= 1 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_string());
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, number, ext.to_string_lossy()),
        None => format!("{}_{}", stem, number),
    };
    path.with_file_name(name)
}

/// Runs a single section of a task document.
pub fn run_section(section: &Section) -> Result<MethodOutput, MethodLabError> {
    let kind = MethodKind::from_identifier(&section.title)
        .ok_or_else(|| TaskError::UnknownMethod(section.title.clone()))?;
    info!("running section '{}'", section.title);
    match kind {
        MethodKind::RootFinding(method) => {
            let problem = RootFindingProblem::from_section(section)?;
            let result = problem.solve(method)?;
            Ok(MethodOutput::RootFinding(result))
        }
        MethodKind::Linear(method) => {
            let input = linear_input(section, None)?;
            Ok(MethodOutput::Linear(solve_linear_system(method, &input)?))
        }
        MethodKind::Interpolation(method) => {
            let x = section.required_f64_list("x")?;
            let y = section.required_f64_list("y")?;
            Ok(MethodOutput::Interpolation(interpolate(method, &x, &y)?))
        }
        MethodKind::Compare(ProblemFamily::RootFinding) => {
            let problem = RootFindingProblem::from_section(section)?;
            Ok(MethodOutput::Comparison(problem.compare()))
        }
        MethodKind::Compare(ProblemFamily::Linear) => {
            let input = linear_input(section, Some(DEFAULT_COMPARISON_RELAXATION))?;
            Ok(MethodOutput::Comparison(compare_linear(&input)))
        }
        MethodKind::Compare(ProblemFamily::Interpolation) => {
            let x = section.required_f64_list("x")?;
            let y = section.required_f64_list("y")?;
            Ok(MethodOutput::Comparison(compare_interpolation(&x, &y)))
        }
    }
}

/// Owned functions and parameters of a root-finding section
struct RootFindingProblem {
    function: Option<SymbolicFunction>,
    g_function: Option<SymbolicFunction>,
    a: Option<f64>,
    b: Option<f64>,
    x0: Option<f64>,
    x1: Option<f64>,
    config: RootFindingConfig,
}

impl RootFindingProblem {
    fn from_section(section: &Section) -> Result<Self, MethodLabError> {
        let function = match section.text("function")? {
            Some(text) => {
                let mut f = SymbolicFunction::from_str(&text, "x")?;
                if let Some(derivative) = section.text("derivative")? {
                    f = f.with_derivative(&derivative)?;
                }
                if let Some(second) = section.text("second_derivative")? {
                    f = f.with_second_derivative(&second)?;
                }
                Some(f)
            }
            None => None,
        };
        let g_function = section
            .text("g_function")?
            .map(|text| SymbolicFunction::from_str(&text, "x"))
            .transpose()?;
        if function.is_none() && g_function.is_none() {
            return Err(TaskError::MissingKey {
                section: section.title.clone(),
                key: "function".to_string(),
            }
            .into());
        }
        let error_kind = match section.text("error_type")? {
            Some(text) => ErrorKind::from_str(&text).map_err(|_| TaskError::InvalidValue {
                section: section.title.clone(),
                key: "error_type".to_string(),
                expected: "absolute or relative".to_string(),
                found: text.clone(),
            })?,
            None => ErrorKind::default(),
        };
        let config = RootFindingConfig::new(
            section.required_f64("tolerance")?,
            section.required_usize("max_iterations")?,
            error_kind,
        );
        Ok(Self {
            function,
            g_function,
            a: section.f64("a")?,
            b: section.f64("b")?,
            x0: section.f64("x0")?,
            x1: section.f64("x1")?,
            config,
        })
    }

    fn input(&self) -> RootFindingInput<'_> {
        RootFindingInput {
            function: self.function.as_ref().map(|f| f as &dyn NumericFunction),
            g_function: self.g_function.as_ref().map(|g| g as &dyn NumericFunction),
            a: self.a,
            b: self.b,
            x0: self.x0,
            x1: self.x1,
        }
    }

    fn solve(&self, method: RootFindingMethod) -> Result<RootFindingResult, RootFindingError> {
        ScalarRootFinder::with_config(self.config).solve_with_method(method, &self.input())
    }

    fn compare(&self) -> ComparisonReport {
        compare_root_finding(&self.config, &self.input())
    }
}

fn linear_input(
    section: &Section,
    default_relaxation: Option<f64>,
) -> Result<LinearSystemInput, MethodLabError> {
    let flat = section.required_f64_list("A")?;
    let n = (flat.len() as f64).sqrt().round() as usize;
    if n * n != flat.len() {
        return Err(TaskError::InvalidValue {
            section: section.title.clone(),
            key: "A".to_string(),
            expected: "n*n values of a square matrix in row-major order".to_string(),
            found: format!("{} values", flat.len()),
        }
        .into());
    }
    let a = DMatrix::from_row_slice(n, n, &flat);
    let b = DVector::from_vec(section.required_f64_list("b")?);
    let x0 = DVector::from_vec(section.required_f64_list("x0")?);
    let norm = match section.text("norm")? {
        Some(text) => NormType::from_str(&text).map_err(|_| TaskError::InvalidValue {
            section: section.title.clone(),
            key: "norm".to_string(),
            expected: "1, 2 or inf".to_string(),
            found: text.clone(),
        })?,
        None => NormType::default(),
    };
    let mut input = LinearSystemInput::new(
        a,
        b,
        x0,
        section.required_f64("tolerance")?,
        section.required_usize("max_iterations")?,
    )
    .with_norm(norm);
    input.w = section.f64("w")?.or(default_relaxation);
    Ok(input)
}

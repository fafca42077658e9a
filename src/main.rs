#![allow(non_snake_case)]
use methodlab::Utils::logger::{TraceTable, init_logger};
use methodlab::numerical::comparison_report::compare_interpolation;
use methodlab::numerical::method_lab::MethodLab;
use methodlab::numerical::numeric_function::SymbolicFunction;
use methodlab::numerical::root_finding::ScalarRootFinder;
use std::env;
use std::process::ExitCode;

const DEMO_TASK: &str = r#"
# root finding: x^3 - 2x - 5 = 0 has a single real root near 2.0945514815
bisection
    function: "x^3 - 2*x - 5"
    a: 2
    b: 3
    tolerance: 1e-6
    max_iterations: 100
newton
    function: "x^3 - 2*x - 5"
    x0: 2.5
    tolerance: 1e-6
    max_iterations: 100
fixed_point
    g_function: "cos(x)"
    x0: 1
    tolerance: 1e-6
    max_iterations: 100
    error_type: relative
// iterative linear solvers
sor
    A: 4, -1, 0, -1, 4, -1, 0, -1, 4
    b: 1, 2, 3
    x0: 0, 0, 0
    norm: inf
    w: 1.1
    tolerance: 1e-6
    max_iterations: 100
// interpolation
newton_interpolation
    x: -1, 0, 3, 4
    y: 15.5, 3, 8, 1
spline_cubico
    x: -1, 0, 3, 4
    y: 15.5, 3, 8, 1
compare_root_finding
    function: "(x - 1)^2*(x + 2)"
    g_function: "(x^3 + 2)/3"
    a: -3
    b: 0
    x0: 2
    x1: 1.8
    tolerance: 1e-6
    max_iterations: 100
"#;

fn run_lab(lab: &MethodLab) -> ExitCode {
    let mut failed = false;
    for (title, run) in lab.run_all() {
        println!("\n==== {} ====", title);
        match run {
            Ok(output) => println!("{}", output.to_table()),
            Err(e) => {
                failed = true;
                println!("error ({:?}): {}", e.kind(), e);
            }
        }
    }
    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    // a task file given on the command line takes precedence over the demos
    if let Some(path) = args.get(1) {
        let lab = match MethodLab::from_file(path) {
            Ok(lab) => lab,
            Err(e) => {
                eprintln!("cannot load task '{}': {}", path, e);
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = lab.init_logging() {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
        return run_lab(&lab);
    }

    let example = 0;
    match example {
        0 => {
            // the built-in task document
            let lab = match MethodLab::from_str(DEMO_TASK) {
                Ok(lab) => lab,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = lab.init_logging() {
                eprintln!("{}", e);
            }
            run_lab(&lab)
        }
        1 => {
            // symbolic function with derivatives filled in automatically
            if let Err(e) = init_logger(Some("info"), false) {
                eprintln!("{}", e);
            }
            let f = match SymbolicFunction::from_str("exp(-x) - x", "x") {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            println!("f'(x) = {}", f.derivative_string(1));
            println!("f''(x) = {}", f.derivative_string(2));
            let mut solver = ScalarRootFinder::new();
            solver.set_tolerance(1e-10);
            match solver.multiple_roots(&f, 1.0) {
                Ok(result) => {
                    println!("{}", result.to_table());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
        2 => {
            // Runge's function: every interpolation method on 11 equally spaced nodes
            if let Err(e) = init_logger(Some("warn"), false) {
                eprintln!("{}", e);
            }
            let x: Vec<f64> = (0..11).map(|i| -1.0 + 0.2 * i as f64).collect();
            let y: Vec<f64> = x.iter().map(|t| 1.0 / (1.0 + 25.0 * t * t)).collect();
            let report = compare_interpolation(&x, &y);
            println!("{}", report.to_table());
            ExitCode::SUCCESS
        }
        _ => {
            println!("no such example");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Utils::logger::TraceTable;
    use crate::numerical::convergence::{Breakdown, ErrorKind, FailureKind, RunOutcome};
    use crate::numerical::numeric_function::{
        ClosureFunction, FunctionWithDerivatives, NumericFunction, SymbolicFunction,
    };
    use crate::numerical::root_finding::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use strum::IntoEnumIterator;

    const ROOT: f64 = 2.0945514815423265;

    fn cubic() -> SymbolicFunction {
        SymbolicFunction::from_str("x^3 - 2*x - 5", "x").unwrap()
    }

    fn solver(tolerance: f64, max_iterations: usize) -> ScalarRootFinder {
        ScalarRootFinder::with_config(RootFindingConfig::new(
            tolerance,
            max_iterations,
            ErrorKind::Absolute,
        ))
    }

    #[test]
    fn test_bisection_cubic() {
        let result = solver(1e-6, 100).bisection(&cubic(), 2.0, 3.0).unwrap();
        assert!(result.converged);
        assert_eq!(result.outcome, RunOutcome::Converged);
        assert!((result.root.unwrap() - 2.094551).abs() < 1e-5);
        assert_eq!(result.iteration_count(), 20);
        assert_eq!(result.iterations[0].error, None);
        assert_eq!(result.iterations[0].bracket, Some((2.0, 3.0)));
        assert_eq!(result.iterations[0].x, 2.5);
        assert!(result.final_error().unwrap() <= 1e-6);
    }

    #[test]
    fn test_newton_needs_far_fewer_iterations_than_bisection() {
        let f = cubic();
        let s = solver(1e-6, 100);
        let bisection = s.bisection(&f, 2.0, 3.0).unwrap();
        let newton = s.newton_raphson(&f, 2.5).unwrap();
        assert!(newton.converged);
        assert_relative_eq!(newton.root.unwrap(), ROOT, epsilon = 1e-9);
        assert_eq!(newton.iterations[0].x, 2.5);
        assert_eq!(newton.iterations[0].error, None);
        assert!(newton.iteration_count() * 3 < bisection.iteration_count());
    }

    #[test]
    fn test_bracket_keeps_sign_change_on_random_intervals() {
        let f = cubic();
        let s = solver(1e-9, 200);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let a = rng.random_range(-10.0..2.0);
            let b = rng.random_range(2.2..10.0);
            for method in [RootFindingMethod::Bisection, RootFindingMethod::FalsePosition] {
                let input = RootFindingInput {
                    function: Some(&f),
                    a: Some(a),
                    b: Some(b),
                    ..Default::default()
                };
                let result = s.solve_with_method(method, &input).unwrap();
                assert!(result.iteration_count() <= 200);
                for record in &result.iterations {
                    let (lo, hi) = record.bracket.unwrap();
                    assert!(f.evaluate(lo) * f.evaluate(hi) < 0.0);
                    assert!(lo <= record.x && record.x <= hi);
                }
            }
        }
    }

    #[test]
    fn test_false_position_cubic() {
        let result = solver(1e-6, 100).false_position(&cubic(), 2.0, 3.0).unwrap();
        assert!(result.converged);
        assert!((result.root.unwrap() - ROOT).abs() < 1e-5);
        assert!(result.iteration_count() < 20);
    }

    #[test]
    fn test_sign_condition_is_checked_before_iterating() {
        let err = solver(1e-6, 100).bisection(&cubic(), 3.0, 4.0).unwrap_err();
        assert!(matches!(err, RootFindingError::NoSignChange { .. }));
        assert_eq!(err.kind(), FailureKind::InputValidation);
        // a root at an end point is not a sign change either
        let f = ClosureFunction::new(|x| x - 2.0, "x - 2".to_string());
        assert!(solver(1e-6, 100).false_position(&f, 2.0, 3.0).is_err());
    }

    #[test]
    fn test_interval_ends() {
        let s = solver(1e-6, 100);
        let swapped = s.bisection(&cubic(), 3.0, 2.0).unwrap();
        assert_eq!(swapped.iterations[0].bracket, Some((2.0, 3.0)));
        assert!(swapped.converged);
        assert_eq!(
            s.bisection(&cubic(), 2.0, 2.0).unwrap_err(),
            RootFindingError::EmptyInterval(2.0)
        );
        assert!(matches!(
            s.bisection(&cubic(), f64::NAN, 2.0).unwrap_err(),
            RootFindingError::NonFiniteInput { name: "a", .. }
        ));
    }

    #[test]
    fn test_exact_midpoint_root_stops_immediately() {
        let f = ClosureFunction::new(|x| x - 2.5, "x - 2.5".to_string());
        let result = solver(1e-12, 100).bisection(&f, 2.0, 3.0).unwrap();
        assert!(result.converged);
        assert_eq!(result.iteration_count(), 1);
        assert_eq!(result.root, Some(2.5));
        assert_eq!(result.final_error(), None);
        assert!(result.message.contains("exact root"));
    }

    #[test]
    fn test_max_iterations_is_not_an_error() {
        let result = solver(1e-12, 5).bisection(&cubic(), 2.0, 3.0).unwrap();
        assert!(!result.converged);
        assert_eq!(result.outcome, RunOutcome::MaxIterationsReached);
        assert_eq!(result.iteration_count(), 5);
        assert_eq!(result.root, None);
        assert_eq!(result.final_estimate(), Some(result.iterations[4].x));
        assert!(result.message.contains("did not converge after 5 iterations"));
    }

    #[test]
    fn test_invalid_configuration() {
        let f = cubic();
        assert_eq!(
            solver(0.0, 100).bisection(&f, 2.0, 3.0).unwrap_err(),
            RootFindingError::InvalidTolerance(0.0)
        );
        assert_eq!(
            solver(1e-6, 0).newton_raphson(&f, 2.0).unwrap_err(),
            RootFindingError::InvalidMaxIterations
        );
    }

    #[test]
    fn test_relative_error() {
        let mut s = solver(1e-8, 100);
        s.set_error_kind(ErrorKind::Relative);
        let result = s.secant(&cubic(), 2.0, 3.0).unwrap();
        assert!(result.converged);
        let last = result.iterations.last().unwrap();
        let previous = &result.iterations[result.iteration_count() - 2];
        assert_relative_eq!(
            last.error.unwrap(),
            (last.x - previous.x).abs() / last.x.abs()
        );
    }

    #[test]
    fn test_fixed_point_cosine() {
        let g = SymbolicFunction::from_str("cos(x)", "x").unwrap();
        let result = solver(1e-6, 100).fixed_point(&g, 1.0).unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.root.unwrap(), 0.739085, epsilon = 1e-5);
        let first = &result.iterations[0];
        assert_eq!(first.x, 1.0);
        assert_relative_eq!(first.gx.unwrap(), 1f64.cos());
        assert_relative_eq!(first.fx, 1f64.cos() - 1.0);
        assert_eq!(result.iterations[1].x, first.gx.unwrap());
    }

    #[test]
    fn test_fixed_point_divergence() {
        let g = ClosureFunction::new(|x| x * x, "x^2".to_string());
        let result = solver(1e-6, 100).fixed_point(&g, 2.0).unwrap();
        assert!(!result.converged);
        assert_eq!(result.root, None);
        assert!(matches!(
            result.outcome,
            RunOutcome::Breakdown(Breakdown::Divergence { .. })
        ));
        assert_eq!(
            result.outcome.failure_kind(),
            Some(FailureKind::NumericalBreakdown)
        );
        assert!(result.iteration_count() < 10);
        assert!(result.final_estimate().is_some());
    }

    #[test]
    fn test_newton_zero_derivative_breakdown() {
        let f = SymbolicFunction::from_str("x^2 + 1", "x").unwrap();
        let result = solver(1e-6, 100).newton_raphson(&f, 0.0).unwrap();
        assert_eq!(result.iteration_count(), 1);
        assert_eq!(
            result.outcome,
            RunOutcome::Breakdown(Breakdown::ZeroDerivative {
                iteration: 1,
                x: 0.0,
                value: 0.0
            })
        );
        assert!(result.message.contains("breakdown"));
    }

    #[test]
    fn test_newton_requires_derivative() {
        let f = ClosureFunction::new(|x| x * x - 2.0, "x^2 - 2".to_string());
        assert_eq!(
            solver(1e-6, 100).newton_raphson(&f, 1.0).unwrap_err(),
            RootFindingError::MissingDerivative {
                method: RootFindingMethod::NewtonRaphson,
                order: 1
            }
        );
        let with_first = FunctionWithDerivatives::new(|x| x * x - 2.0, |x| 2.0 * x, "f".to_string());
        assert!(matches!(
            solver(1e-6, 100).multiple_roots(&with_first, 1.0).unwrap_err(),
            RootFindingError::MissingDerivative { order: 2, .. }
        ));
    }

    #[test]
    fn test_non_finite_value_breakdown() {
        let f = SymbolicFunction::from_str("ln(x)", "x").unwrap();
        let result = solver(1e-6, 100).newton_raphson(&f, 3.0).unwrap();
        assert_eq!(
            result.outcome,
            RunOutcome::Breakdown(Breakdown::NonFiniteValue { iteration: 2 })
        );
        assert_eq!(result.iteration_count(), 1);
    }

    #[test]
    fn test_secant_cubic() {
        let result = solver(1e-6, 100).secant(&cubic(), 2.0, 3.0).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations[0].x, 2.0);
        assert_eq!(result.iterations[1].x, 3.0);
        assert_eq!(result.iterations[1].error, Some(1.0));
        assert_relative_eq!(result.root.unwrap(), ROOT, epsilon = 1e-9);
    }

    #[test]
    fn test_secant_flat_function_breaks_down() {
        let f = ClosureFunction::new(|_| 1.0, "1".to_string());
        let result = solver(1e-6, 100).secant(&f, 0.0, 1.0).unwrap();
        assert_eq!(result.iteration_count(), 2);
        assert!(matches!(
            result.outcome,
            RunOutcome::Breakdown(Breakdown::ZeroDenominator { iteration: 2, .. })
        ));
        assert!(result.message.contains("after 2 recorded iterations"));
        assert!(result.message.contains("last estimate x = 1 with absolute error 1.000e0"));
    }

    #[test]
    fn test_multiple_roots_zero_denominator_breakdown() {
        let f = FunctionWithDerivatives::with_second_derivative(
            |_: f64| 1.0,
            |_: f64| 0.0,
            |_: f64| 0.0,
            "1".to_string(),
        );
        let result = solver(1e-6, 100).multiple_roots(&f, 0.5).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iteration_count(), 1);
        assert_eq!(
            result.outcome,
            RunOutcome::Breakdown(Breakdown::ZeroDenominator {
                iteration: 1,
                x: 0.5,
                value: 0.0
            })
        );
        assert!(result.message.contains("after 1 recorded iterations"));
        assert!(result.message.contains("absolute error n/a"));
    }

    #[test]
    fn test_false_position_exact_root_stops_immediately() {
        // the first false position point of a line is its root
        let f = ClosureFunction::new(|x| x - 2.5, "x - 2.5".to_string());
        let result = solver(1e-12, 100).false_position(&f, 2.0, 4.0).unwrap();
        assert!(result.converged);
        assert_eq!(result.iteration_count(), 1);
        assert_eq!(result.root, Some(2.5));
        assert_eq!(result.iterations[0].bracket, Some((2.0, 4.0)));
        assert!(result.message.contains("exact root"));
    }

    #[test]
    fn test_fixed_point_exact_start() {
        let g = ClosureFunction::new(|x| 0.5 * x + 1.0, "x/2 + 1".to_string());
        let result = solver(1e-12, 100).fixed_point(&g, 2.0).unwrap();
        assert!(result.converged);
        assert_eq!(result.iteration_count(), 1);
        assert_eq!(result.root, Some(2.0));
        assert_eq!(result.iterations[0].fx, 0.0);
        assert!(result.message.contains("is an exact fixed point"));
    }

    #[test]
    fn test_multiple_roots_on_double_root() {
        let f = FunctionWithDerivatives::with_second_derivative(
            |x: f64| (x - 1.0) * (x - 1.0) * (x + 2.0),
            |x: f64| 2.0 * (x - 1.0) * (x + 2.0) + (x - 1.0) * (x - 1.0),
            |x: f64| 2.0 * (x + 2.0) + 4.0 * (x - 1.0),
            "(x - 1)^2 (x + 2)".to_string(),
        );
        let s = solver(1e-6, 100);
        let multiple = s.multiple_roots(&f, 2.0).unwrap();
        let newton = s.newton_raphson(&f, 2.0).unwrap();
        assert!(multiple.converged);
        assert!(newton.converged);
        assert_relative_eq!(multiple.root.unwrap(), 1.0, epsilon = 1e-9);
        assert!(multiple.iteration_count() * 3 < newton.iteration_count());
        assert!(multiple.iterations.iter().all(|r| r.d2fx.is_some()));
    }

    #[test]
    fn test_solve_with_method_reports_missing_inputs() {
        let f = cubic();
        let s = solver(1e-6, 100);
        let input = RootFindingInput {
            function: Some(&f),
            x0: Some(2.5),
            ..Default::default()
        };
        assert!(s.solve_with_method(RootFindingMethod::NewtonRaphson, &input).is_ok());
        assert!(matches!(
            s.solve_with_method(RootFindingMethod::Bisection, &input),
            Err(RootFindingError::MissingInput { .. })
        ));
        assert!(matches!(
            s.solve_with_method(RootFindingMethod::FixedPoint, &input),
            Err(RootFindingError::MissingInput { .. })
        ));
    }

    #[test]
    fn test_method_identifiers() {
        for method in RootFindingMethod::iter() {
            assert_eq!(RootFindingMethod::from_identifier(method.identifier()), Some(method));
        }
        assert_eq!(
            RootFindingMethod::from_identifier("reglaFalsa"),
            Some(RootFindingMethod::FalsePosition)
        );
        assert_eq!(
            RootFindingMethod::from_identifier("raicesMultiples"),
            Some(RootFindingMethod::MultipleRoots)
        );
        assert_eq!(RootFindingMethod::from_identifier("golden_section"), None);
    }

    #[test]
    fn test_trace_table() {
        let result = solver(1e-6, 100).bisection(&cubic(), 2.0, 3.0).unwrap();
        assert_eq!(result.headers(), vec!["iter", "a", "x_m", "b", "f(x_m)", "error"]);
        let rows = result.rows();
        assert_eq!(rows.len(), result.iteration_count());
        assert_eq!(rows[0][5], "n/a");
        let table = result.to_table();
        assert!(table.contains("x_m"));
        assert!(table.contains(&result.message));
    }

    #[test]
    fn test_convenience_functions() {
        let result = bisection(|x| x * x - 2.0, 0.0, 2.0, 1e-8).unwrap();
        assert_relative_eq!(result.root.unwrap(), 2f64.sqrt(), epsilon = 1e-7);
        let result = secant(|x| x * x - 2.0, 1.0, 2.0, 1e-10).unwrap();
        assert_relative_eq!(result.root.unwrap(), 2f64.sqrt(), epsilon = 1e-9);
    }
}

/////////////////////////////TESTS////////////////////////////////////////////////////
/*
tests:
title, key and value parsers
quoted strings
section and document parsing
comments
typed accessors
malformed documents
file-based parsing
*/

#[cfg(test)]
mod tests1 {

    use crate::Utils::task_parser::{
        TaskError, Value, filter_comments, parse_key, parse_key_value_pair, parse_section,
        parse_task_document, parse_task_file, parse_title, parse_value, parse_value_list,
    };
    use std::io::Write;

    #[test]
    fn test_parse_title() {
        let (remaining, title) = parse_title("title1\n key1: value1").unwrap();
        assert_eq!(title, "title1");
        assert_eq!(remaining, "key1: value1");

        let (remaining, title) = parse_title("compare_root_finding key1: value1").unwrap();
        assert_eq!(title, "compare_root_finding");
        assert_eq!(remaining, "key1: value1");
    }

    #[test]
    fn test_parse_key() {
        let (remaining, key) = parse_key("max_iterations: 100").unwrap();
        assert_eq!(key, "max_iterations");
        assert_eq!(remaining, ": 100");

        let (remaining, key) = parse_key("x0: 1").unwrap();
        assert_eq!(key, "x0");
        assert_eq!(remaining, ": 1");
    }

    #[test]
    fn test_parse_value() {
        let (remaining, value) = parse_value("value1, value2").unwrap();
        assert_eq!(value, Value::String("value1".to_string()));
        assert_eq!(remaining, ", value2");

        let (_, value) = parse_value("123, next").unwrap();
        assert_eq!(value, Value::Integer(123));

        let (_, value) = parse_value("1e-6").unwrap();
        assert_eq!(value, Value::Float(1e-6));

        let (_, value) = parse_value("-2.5").unwrap();
        assert_eq!(value, Value::Float(-2.5));

        let (_, value) = parse_value("true").unwrap();
        assert_eq!(value, Value::Boolean(true));
    }

    #[test]
    fn test_quoted_values() {
        let (remaining, value) = parse_value("\"x^3 - 2*x - 5\" rest").unwrap();
        assert_eq!(value, Value::String("x^3 - 2*x - 5".to_string()));
        assert_eq!(remaining, " rest");

        let (_, values) = parse_value_list("\"a, b\", 3").unwrap();
        assert_eq!(
            values,
            vec![Value::String("a, b".to_string()), Value::Integer(3)]
        );
    }

    #[test]
    fn test_parse_value_list() {
        let (remaining, values) = parse_value_list("value1, 123, 45.67, true").unwrap();
        assert_eq!(
            values,
            vec![
                Value::String("value1".to_string()),
                Value::Integer(123),
                Value::Float(45.67),
                Value::Boolean(true)
            ]
        );
        assert_eq!(remaining, "");

        let (remaining, values) = parse_value_list("").unwrap();
        assert_eq!(values, Vec::<Value>::new());
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, values)) = parse_key_value_pair("b : 1 , 2").unwrap();
        assert_eq!(key, "b");
        assert_eq!(values, vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(remaining, "");

        // empty list followed by the next line
        let (remaining, (key, values)) = parse_key_value_pair("w:\nnorm: inf").unwrap();
        assert_eq!(key, "w");
        assert!(values.is_empty());
        assert_eq!(remaining, "norm: inf");
    }

    #[test]
    fn test_parse_section() {
        let input = "bisection\n function: \"x^2 - 2\"\n a: 0\n b: 2\nnewton\n x0: 1";
        let (remaining, section) = parse_section(input).unwrap();
        assert_eq!(section.title, "bisection");
        assert_eq!(section.values.len(), 3);
        assert_eq!(
            section.get("function").unwrap(),
            &[Value::String("x^2 - 2".to_string())]
        );
        assert_eq!(remaining, "newton\n x0: 1");
    }

    #[test]
    fn test_filter_comments() {
        let filtered = filter_comments("# header\nsecant\n// note\n\n  x0: 1\n");
        assert_eq!(filtered, "secant\n  x0: 1");
    }

    #[test]
    fn test_parse_task_document() {
        let input = r#"
        # root finding
        bisection
            function: "x^3 - 2*x - 5"
            a: 2
            b: 3
            tolerance: 1e-6
            max_iterations: 100
        // linear system
        jacobi
            A: 4, -1, 0, -1, 4, -1, 0, -1, 4
            b: 1, 2, 3
            x0: 0, 0, 0
            norm: inf
            tolerance: 1e-6
            max_iterations: 100
        bisection
            function: "cos(x) - x"
            a: 0
            b: 1
            tolerance: 1e-8
            max_iterations: 60
        "#;
        let document = parse_task_document(input).unwrap();
        assert_eq!(document.titles(), vec!["bisection", "jacobi", "bisection"]);
        let first = document.section("bisection").unwrap();
        assert_eq!(first.required_text("function").unwrap(), "x^3 - 2*x - 5");
        assert_eq!(first.required_f64("a").unwrap(), 2.0);
        assert_eq!(first.required_usize("max_iterations").unwrap(), 100);
        let jacobi = &document.sections[1];
        assert_eq!(jacobi.required_f64_list("A").unwrap().len(), 9);
        assert_eq!(jacobi.f64("norm").unwrap(), Some(f64::INFINITY));
        assert_eq!(jacobi.f64("w").unwrap(), None);
        assert_eq!(
            document.sections[2].required_f64("tolerance").unwrap(),
            1e-8
        );
    }

    #[test]
    fn test_typed_accessors_report_key_and_section() {
        let document =
            parse_task_document("newton\n x0: abc\n max_iterations: -3\n b: 1, 2").unwrap();
        let section = &document.sections[0];
        assert_eq!(
            section.required_f64("x0").unwrap_err(),
            TaskError::InvalidValue {
                section: "newton".to_string(),
                key: "x0".to_string(),
                expected: "a number".to_string(),
                found: "abc".to_string(),
            }
        );
        assert!(matches!(
            section.required_usize("max_iterations"),
            Err(TaskError::InvalidValue { .. })
        ));
        // a list where one number is expected
        assert!(matches!(
            section.f64("b"),
            Err(TaskError::InvalidValue { .. })
        ));
        assert_eq!(
            section.required_f64("tolerance").unwrap_err(),
            TaskError::MissingKey {
                section: "newton".to_string(),
                key: "tolerance".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_documents() {
        assert_eq!(parse_task_document("# only a comment\n").unwrap_err(), TaskError::Empty);
        assert!(matches!(
            parse_task_document("bisection\n a 2"),
            Err(TaskError::Syntax { .. })
        ));
        assert!(matches!(
            parse_task_document(": 2"),
            Err(TaskError::Syntax { .. })
        ));
    }

    #[test]
    fn test_repeated_key_is_rejected() {
        let input = "bisection\n a: 2\n b: 3\n a: 1\nnewton\n x0: 1";
        assert_eq!(
            parse_task_document(input).unwrap_err(),
            TaskError::DuplicateKey("a".to_string())
        );
        assert!(matches!(
            parse_section("secant\n x0: 1\n x0: 2"),
            Err(nom::Err::Failure(_))
        ));
        // the same key in different sections is fine
        let document = parse_task_document("newton\n x0: 1\nsecant\n x0: 2\n x1: 3").unwrap();
        assert_eq!(document.sections[1].required_f64("x0").unwrap(), 2.0);
    }

    #[test]
    fn test_parse_task_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lagrange\n x: 0, 1, 2\n y: 1, 0, 3").unwrap();
        let document = parse_task_file(file.path()).unwrap();
        let section = document.section("lagrange").unwrap();
        assert_eq!(section.required_f64_list("y").unwrap(), vec![1.0, 0.0, 3.0]);
        assert!(parse_task_file("/definitely/not/here.txt").is_err());
    }
}

/// Parses task documents with structure like
/// ```text
/// # comment
/// title1
///   key1: value1, value2
///   key2: "a quoted string, with commas"
/// title2
///   key3: 1e-6
/// ```
/// into an ordered list of sections. Every section has a title and pairs key - vector of values.
/// Lines starting with `#` or `//` are comments. Values are integers, floats, booleans, bare words
/// or double-quoted strings; a bare word ends at the first comma, whitespace or semicolon, so
/// anything with spaces (a formula) must be quoted.
use crate::numerical::convergence::FailureKind;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, char, multispace0, space0},
    combinator::{map, recognize},
    error::{Error as NomError, ErrorKind as NomErrorKind},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;
use thiserror::Error;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// floats and integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Float(_) => "float",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    #[error("the task document contains no sections")]
    Empty,
    #[error("could not parse the task document near '{remaining}'")]
    Syntax { remaining: String },
    #[error("unknown method '{0}'")]
    UnknownMethod(String),
    #[error("key '{0}' is given more than once in the same section")]
    DuplicateKey(String),
    #[error("section '{section}': missing required key '{key}'")]
    MissingKey { section: String, key: String },
    #[error("section '{section}': key '{key}' expects {expected}, got '{found}'")]
    InvalidValue {
        section: String,
        key: String,
        expected: String,
        found: String,
    },
}

impl TaskError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::InputValidation
    }
}

/// One titled block of key: values lines
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub title: String,
    pub values: HashMap<String, Vec<Value>>,
}

impl Section {
    pub fn get(&self, key: &str) -> Option<&[Value]> {
        self.values.get(key).map(|v| v.as_slice())
    }

    fn invalid(&self, key: &str, expected: &str, found: &[Value]) -> TaskError {
        TaskError::InvalidValue {
            section: self.title.clone(),
            key: key.to_string(),
            expected: expected.to_string(),
            found: found
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    fn missing(&self, key: &str) -> TaskError {
        TaskError::MissingKey {
            section: self.title.clone(),
            key: key.to_string(),
        }
    }

    /// the single value of `key`, None when the key is absent
    fn single(&self, key: &str, expected: &str) -> Result<Option<&Value>, TaskError> {
        match self.get(key) {
            None => Ok(None),
            Some([value]) => Ok(Some(value)),
            Some(found) => Err(self.invalid(key, expected, found)),
        }
    }

    pub fn f64(&self, key: &str) -> Result<Option<f64>, TaskError> {
        match self.single(key, "a number")? {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "a number", std::slice::from_ref(value))),
        }
    }

    pub fn required_f64(&self, key: &str) -> Result<f64, TaskError> {
        self.f64(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn usize(&self, key: &str) -> Result<Option<usize>, TaskError> {
        let expected = "a non-negative integer";
        match self.single(key, expected)? {
            None => Ok(None),
            Some(value) => value
                .as_integer()
                .and_then(|i| usize::try_from(i).ok())
                .map(Some)
                .ok_or_else(|| self.invalid(key, expected, std::slice::from_ref(value))),
        }
    }

    pub fn required_usize(&self, key: &str) -> Result<usize, TaskError> {
        self.usize(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn f64_list(&self, key: &str) -> Result<Option<Vec<f64>>, TaskError> {
        match self.get(key) {
            None => Ok(None),
            Some(values) => values
                .iter()
                .map(|v| v.as_f64())
                .collect::<Option<Vec<f64>>>()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "a list of numbers", values)),
        }
    }

    pub fn required_f64_list(&self, key: &str) -> Result<Vec<f64>, TaskError> {
        self.f64_list(key)?.ok_or_else(|| self.missing(key))
    }

    /// Text of a single value of any type; numbers are printed back.
    pub fn text(&self, key: &str) -> Result<Option<String>, TaskError> {
        Ok(self.single(key, "a single value")?.map(|v| v.to_string()))
    }

    pub fn required_text(&self, key: &str) -> Result<String, TaskError> {
        self.text(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn bool(&self, key: &str) -> Result<Option<bool>, TaskError> {
        match self.single(key, "true or false")? {
            None => Ok(None),
            Some(value) => value
                .as_boolean()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "true or false", std::slice::from_ref(value))),
        }
    }
}

/// Sections in document order; a title may appear more than once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDocument {
    pub sections: Vec<Section>,
}

impl TaskDocument {
    /// first section with the given title
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn titles(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.title.as_str()).collect()
    }
}

/// Parses a title (word characters without spaces)
pub fn parse_title(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    let (input, result) = parser.parse(input)?;
    // Ignore trailing whitespace and newline characters
    let input = input.trim_start();
    Ok((input, result))
}

/// Parses a key (word characters without spaces)
pub fn parse_key(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

/// "anything but a double quote"
fn parse_quoted(input: &str) -> IResult<&str, Value> {
    let parser = delimited(char('"'), take_while(|c: char| c != '"'), char('"'));
    map(parser, |s: &str| Value::String(s.to_string())).parse(input)
}

fn parse_bare(input: &str) -> IResult<&str, Value> {
    // excluding commas, whitespace, newlines, and semicolons
    let parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';' | '"'));
    map(parser, |s: &str| {
        // Try parsing as different types in order
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    })
    .parse(input)
}

pub fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((parse_quoted, parse_bare)).parse(input)
}

/// Comma-separated values on one line; may be empty.
pub fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator_coma = delimited(space0, tag(","), space0);
    separated_list0(separator_coma, parse_value).parse(input)
}

/// Parses a key-value pair where value is a list
pub fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim_start(), result))
}

/// Parses a section with a title and at least one key-value pair. A key repeated inside the
/// section is a hard failure pointing at the second occurrence.
pub fn parse_section(input: &str) -> IResult<&str, Section> {
    let (input, _) = space0(input)?;
    let (mut input, title) = parse_title(input)?;
    let mut parser = terminated(parse_key_value_pair, space0);
    let mut values = HashMap::new();
    loop {
        let (rest, _) = multispace0(input)?;
        match parser.parse(rest) {
            Ok((next, (key, list))) => {
                if values.contains_key(&key) {
                    return Err(nom::Err::Failure(NomError::new(rest, NomErrorKind::Verify)));
                }
                values.insert(key, list);
                input = next;
            }
            Err(nom::Err::Error(e)) => {
                if values.is_empty() {
                    return Err(nom::Err::Error(NomError::new(e.input, NomErrorKind::Many1)));
                }
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok((input, Section { title, values }))
}

/// Removes comment lines (starting with // or #) and blank lines
pub fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with('#') && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses comment-free text into sections
pub fn parse_document(input: &str) -> IResult<&str, Vec<Section>> {
    let mut parser = many1(delimited(multispace0, parse_section, multispace0));
    parser.parse(input)
}

/// Parses a whole task document. Everything must be consumed.
pub fn parse_task_document(input: &str) -> Result<TaskDocument, TaskError> {
    let filtered = filter_comments(input);
    if filtered.trim().is_empty() {
        return Err(TaskError::Empty);
    }
    match parse_document(&filtered) {
        Ok((remaining, sections)) => {
            if !remaining.trim().is_empty() {
                return Err(TaskError::Syntax {
                    remaining: remaining.lines().next().unwrap_or_default().to_string(),
                });
            }
            Ok(TaskDocument { sections })
        }
        Err(nom::Err::Failure(e)) if e.code == NomErrorKind::Verify => {
            let key = parse_key(e.input).map(|(_, key)| key).unwrap_or_default();
            Err(TaskError::DuplicateKey(key))
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(TaskError::Syntax {
            remaining: e.input.lines().next().unwrap_or_default().to_string(),
        }),
        Err(nom::Err::Incomplete(_)) => Err(TaskError::Syntax {
            remaining: String::new(),
        }),
    }
}

/// Reads and parses a task document from a file
pub fn parse_task_file<P: AsRef<std::path::Path>>(path: P) -> Result<TaskDocument, TaskError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| TaskError::InvalidValue {
        section: String::new(),
        key: "file".to_string(),
        expected: "a readable task file".to_string(),
        found: format!("{} ({})", path.display(), e),
    })?;
    parse_task_document(&content)
}

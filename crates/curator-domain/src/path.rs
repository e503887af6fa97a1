//! Typed dotted paths into nested record fields

use crate::DomainError;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Path to a field inside a record, e.g. `Result.processed_query`
///
/// A path is an ordered, non-empty list of non-empty key segments. Applying
/// it walks the JSON tree from the root, creating missing intermediate
/// objects, and overwrites the leaf.
///
/// # Examples
///
/// ```
/// use curator_domain::FieldPath;
/// use serde_json::json;
///
/// let path: FieldPath = "Result.meta.reviewed".parse().unwrap();
/// let mut record = json!({"Input": {}, "Result": {"id": 1}});
/// path.apply(&mut record, json!(true)).unwrap();
/// assert_eq!(record["Result"]["meta"]["reviewed"], json!(true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Build a path from segments
    pub fn new(segments: Vec<String>) -> Result<Self, DomainError> {
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(DomainError::InvalidPath(segments.join(".")));
        }
        Ok(Self { segments })
    }

    /// Parse a dotted path
    pub fn parse(path: &str) -> Result<Self, DomainError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidPath(path.to_string()));
        }
        Self::new(trimmed.split('.').map(str::to_string).collect())
    }

    /// Path segments, root first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Read the value at this path, if every segment exists
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| current.as_object()?.get(segment))
    }

    /// Set the value at this path
    ///
    /// Missing intermediate objects are created. If an intermediate exists
    /// but is not an object the walk stops with [`DomainError::NotAnObject`];
    /// intermediates created before that point stay in `root`, so callers
    /// that need all-or-nothing semantics should go through [`Changes::apply`].
    pub fn apply(&self, root: &mut Value, value: Value) -> Result<(), DomainError> {
        let (leaf, parents) = self
            .segments
            .split_last()
            .ok_or_else(|| DomainError::InvalidPath(String::new()))?;

        let mut current = root;
        let mut current_name = "<root>";
        for segment in parents {
            let obj = current
                .as_object_mut()
                .ok_or_else(|| self.not_an_object(current_name))?;
            current = obj
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            current_name = segment;
        }

        let obj = current
            .as_object_mut()
            .ok_or_else(|| self.not_an_object(current_name))?;
        obj.insert(leaf.clone(), value);
        Ok(())
    }

    fn not_an_object(&self, segment: &str) -> DomainError {
        DomainError::NotAnObject {
            path: self.to_string(),
            segment: segment.to_string(),
        }
    }
}

impl FromStr for FieldPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// An ordered set of field assignments applied together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    entries: Vec<(FieldPath, Value)>,
}

impl Changes {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an assignment (builder style)
    pub fn set(mut self, path: FieldPath, value: Value) -> Self {
        self.push(path, value);
        self
    }

    /// Add an assignment
    pub fn push(&mut self, path: FieldPath, value: Value) {
        self.entries.push((path, value));
    }

    /// Parse a `PATH=VALUE` assignment
    ///
    /// The value is read as JSON when it parses (`5`, `true`, `{"a":1}`),
    /// otherwise it is taken verbatim as a string.
    pub fn parse_assignment(assignment: &str) -> Result<(FieldPath, Value), DomainError> {
        let (path, raw) = assignment
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidAssignment(assignment.to_string()))?;
        let path = FieldPath::parse(path)?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        Ok((path, value))
    }

    /// Build a change set from `PATH=VALUE` assignments
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut changes = Self::new();
        for assignment in assignments {
            let (path, value) = Self::parse_assignment(assignment.as_ref())?;
            changes.push(path, value);
        }
        Ok(changes)
    }

    /// Iterate over assignments in order
    pub fn iter(&self) -> impl Iterator<Item = &(FieldPath, Value)> {
        self.entries.iter()
    }

    /// Number of assignments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no assignments
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every assignment in order, all or nothing
    pub fn apply(&self, root: &mut Value) -> Result<(), DomainError> {
        let mut staged = root.clone();
        for (path, value) in &self.entries {
            path.apply(&mut staged, value.clone())?;
        }
        *root = staged;
        Ok(())
    }
}

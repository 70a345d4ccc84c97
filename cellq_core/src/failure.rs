//! Typed per-job failures that end up in the published result message.

use std::fmt::Display;
use std::str::FromStr;

/// Every kind of failure a single job can end with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The message body is not a JSON object.
    InvalidPayload,
    /// A required field is absent from the payload.
    MissingField,
    /// A field is present but cannot be coerced to the expected type.
    InvalidParameter,
    /// The threshold is outside of the accepted range.
    ThresholdValue,
    /// An input object could not be read from storage.
    ReadFile,
    /// The meta dataset could not be parsed.
    ParseMeta,
    /// The counts dataset could not be parsed.
    ParseCounts,
    /// The computation filtered out every count.
    AllCountsFiltered,
    /// The computation ran but produced no usable output.
    EmptyResult,
    /// The plotter ran but produced no image.
    Plot,
    /// The declared plot type has no handler.
    UnknownPlotType,
    /// Anything else; never carries details in the published message.
    Unknown,
}

impl FailureKind {
    /// The `error.id` published for this kind of failure
    pub fn id(&self) -> &'static str {
        use FailureKind::*;
        match self {
            InvalidPayload => "InvalidPayload",
            MissingField => "MissingField",
            InvalidParameter => "InvalidParameter",
            ThresholdValue => "ThresholdValueError",
            ReadFile => "ReadFileError",
            ParseMeta => "ParseMetaError",
            ParseCounts => "ParseCountsError",
            AllCountsFiltered => "AllCountsFilteredError",
            EmptyResult => "EmptyResultError",
            Plot => "PlotError",
            UnknownPlotType => "UnknownPlotType",
            Unknown => "unknown_error",
        }
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for FailureKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use FailureKind::*;
        [
            InvalidPayload,
            MissingField,
            InvalidParameter,
            ThresholdValue,
            ReadFile,
            ParseMeta,
            ParseCounts,
            AllCountsFiltered,
            EmptyResult,
            Plot,
            UnknownPlotType,
            Unknown,
        ]
        .into_iter()
        .find(|kind| kind.id() == s)
        .ok_or_else(|| format!("Unknown failure kind: {}", s))
    }
}

/// A failure of one job, populated where the problem is detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    kind: FailureKind,
    description: Option<String>,
    hint: Option<String>,
}

impl JobFailure {
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            description: None,
            hint: None,
        }
    }

    /// Set what went wrong
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set what the submitter could do about it
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn get_hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Human-readable message: description and hint as sentences, or empty
    pub fn message(&self) -> String {
        [self.description.as_deref(), self.hint.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                if part.ends_with('.') {
                    part.to_string()
                } else {
                    format!("{}.", part)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(FailureKind::MissingField)
            .description(format!("Missing required field '{}'", field))
    }

    pub fn invalid_parameter(field: &str, expected: &str) -> Self {
        Self::new(FailureKind::InvalidParameter)
            .description(format!("Field '{}' is not a valid {}", field, expected))
    }

    pub fn unknown_plot_type(plot_type: &str) -> Self {
        Self::new(FailureKind::UnknownPlotType)
            .description(format!("Given plot type does not exist: {}", plot_type))
    }

    pub fn read_file(key: &str) -> Self {
        Self::new(FailureKind::ReadFile)
            .description(format!("Could not read file '{}'", key))
            .hint("Check that the file was uploaded and the key is correct")
    }
}

impl Display for JobFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = self.message();
        if message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, message)
        }
    }
}

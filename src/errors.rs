use graphql_parser::Pos;
use std::fmt;

/// A line/column pair pointing into a schema or operation document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl From<Pos> for Position {
    fn from(pos: Pos) -> Position {
        Position {
            line: pos.line,
            column: pos.column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Optional position, displayed as a `line:column: ` message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location(pub Option<Position>);

impl Location {
    pub fn unknown() -> Location {
        Location(None)
    }

    pub fn at<P: Into<Position>>(pos: P) -> Location {
        Location(Some(pos.into()))
    }
}

impl From<Position> for Location {
    fn from(position: Position) -> Location {
        Location(Some(position))
    }
}

impl From<Option<Position>> for Location {
    fn from(position: Option<Position>) -> Location {
        Location(position)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(position) => write!(f, "{}: ", position),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotSupported,
    DuplicateDefinition,
    MissingDiscriminator,
    UnknownScalar,
    UndefinedField,
    InvalidOption,
    Parse,
    Internal,
}

/// Everything that can abort a generation run. None of these are retried.
#[derive(Debug, Fail, PartialEq)]
pub enum GenerateError {
    #[fail(display = "{}{} is not supported (set allow_broken_features to enable it)", location,
           feature)]
    NotSupported { location: Location, feature: String },
    #[fail(display = "{}{} defined twice", location, name)]
    DuplicateDefinition { location: Location, name: String },
    #[fail(display = "{}union/interface type {} must request __typename", location, type_name)]
    MissingDiscriminator { location: Location, type_name: String },
    #[fail(display = "{}unknown scalar {}: please add a binding for it to the scalars config",
           location, name)]
    UnknownScalar { location: Location, name: String },
    #[fail(display = "{}undefined field {}", location, alias)]
    UndefinedField { location: Location, alias: String },
    #[fail(display = "{}invalid option: {}", location, message)]
    InvalidOption { location: Location, message: String },
    #[fail(display = "failed to parse {}: {}", document, message)]
    Parse {
        document: &'static str,
        message: String,
    },
    /// The schema or the operation broke an invariant that upstream validation should enforce.
    #[fail(display = "{}internal error: {}", location, message)]
    Internal { location: Location, message: String },
}

impl GenerateError {
    pub fn internal<L: Into<Location>, S: Into<String>>(location: L, message: S) -> GenerateError {
        GenerateError::Internal {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn not_supported<L: Into<Location>, S: Into<String>>(
        location: L,
        feature: S,
    ) -> GenerateError {
        GenerateError::NotSupported {
            location: location.into(),
            feature: feature.into(),
        }
    }

    pub fn duplicate<L: Into<Location>, S: Into<String>>(location: L, name: S) -> GenerateError {
        GenerateError::DuplicateDefinition {
            location: location.into(),
            name: name.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerateError::NotSupported { .. } => ErrorKind::NotSupported,
            GenerateError::DuplicateDefinition { .. } => ErrorKind::DuplicateDefinition,
            GenerateError::MissingDiscriminator { .. } => ErrorKind::MissingDiscriminator,
            GenerateError::UnknownScalar { .. } => ErrorKind::UnknownScalar,
            GenerateError::UndefinedField { .. } => ErrorKind::UndefinedField,
            GenerateError::InvalidOption { .. } => ErrorKind::InvalidOption,
            GenerateError::Parse { .. } => ErrorKind::Parse,
            GenerateError::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            GenerateError::NotSupported { location, .. }
            | GenerateError::DuplicateDefinition { location, .. }
            | GenerateError::MissingDiscriminator { location, .. }
            | GenerateError::UnknownScalar { location, .. }
            | GenerateError::UndefinedField { location, .. }
            | GenerateError::InvalidOption { location, .. }
            | GenerateError::Internal { location, .. } => location.0,
            GenerateError::Parse { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_prefixed_with_the_position() {
        let err = GenerateError::UndefinedField {
            location: Location::at(Pos { line: 3, column: 9 }),
            alias: "furDensity".to_string(),
        };
        assert_eq!(err.to_string(), "3:9: undefined field furDensity");
        assert_eq!(err.position(), Some(Position { line: 3, column: 9 }));
        assert_eq!(err.kind(), ErrorKind::UndefinedField);
    }

    #[test]
    fn messages_without_position_have_no_prefix() {
        let err = GenerateError::duplicate(Location::unknown(), "GetDogResponse");
        assert_eq!(err.to_string(), "GetDogResponse defined twice");
        assert_eq!(err.position(), None);
    }
}

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    EmptyBatch { field: &'static str },
    NotABroadcast { index: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::EmptyBatch { field } => write!(f, "{field} must contain at least one item"),
            Self::NotABroadcast { index } => write!(
                f,
                "message {index} differs in sender or text; v1 can only send one text from one sender"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

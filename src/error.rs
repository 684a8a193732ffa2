use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The document has no element with this id, or the element is void and
    /// can't hold any content.
    ElementNotFound(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ElementNotFound(id) => {
                write!(f, "no element with id {id:?} that can hold content")
            }
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("No dice notation found in {0:?}")]
    NoMatch(String),
}

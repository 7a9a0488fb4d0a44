#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Cannot draw {requested} distinct numbers from {eligible} eligible values")]
    InsufficientRange { requested: usize, eligible: usize },
    #[error("Bad configuration: {0}")]
    Configuration(String),
    #[error("Distribution error: {0}")]
    Distribution(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("induced costs have already been initialized for this engine")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("cannot score against an empty expected answer set")]
    EmptyExpectedSet,
}

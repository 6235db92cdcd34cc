use crate::error::FmkError;

pub type FmkResult<T> = Result<T, FmkError>;

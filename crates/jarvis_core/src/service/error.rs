//! Error type shared by collection services.

use crate::model::id::RecordId;
use crate::repo::kv_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// No record with this ID exists in the named collection.
    NotFound {
        collection: &'static str,
        id: RecordId,
    },
    /// Input rejected before touching storage.
    InvalidInput(&'static str),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { collection, id } => write!(f, "{collection} not found: {id}"),
            Self::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

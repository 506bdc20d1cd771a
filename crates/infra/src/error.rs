use thiserror::Error;

use stocktake_core::DomainError;

use crate::store::StoreError;

/// Failure of a repository operation: either the store or a domain rule.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

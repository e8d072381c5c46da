//! Generic record service shared by users and students.

use crate::crud::record::Record;
use crate::crud::repository::{DatabaseError, Repository};
use crate::db::SessionProvider;
use crate::model::student::{Student, StudentCreateResponse, StudentResponse};
use crate::model::user::{User, UserResponse, UserUpdateResponse};
use crate::model::{now_epoch_ms, to_response, RecordId};
use log::warn;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-layer failures visible to outer layers.
#[derive(Debug)]
pub enum ServiceError {
    /// A repository operation failed.
    Failed(DatabaseError),
    /// Read-by-id found no record.
    NotFound { label: &'static str, id: RecordId },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(err) => write!(f, "{err}"),
            Self::NotFound { label, id } => {
                write!(f, "{label} with id {id} not found in the system.")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Failed(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(value: DatabaseError) -> Self {
        Self::Failed(value)
    }
}

/// Response shapes a record kind is projected into.
pub trait Projected: Record {
    type Response: for<'a> From<&'a Self> + Serialize;
    type CreateResponse: for<'a> From<&'a Self> + Serialize;
    type UpdateResponse: for<'a> From<&'a Self> + Serialize;
}

impl Projected for User {
    type Response = UserResponse;
    type CreateResponse = UserResponse;
    type UpdateResponse = UserUpdateResponse;
}

impl Projected for Student {
    type Response = StudentResponse;
    type CreateResponse = StudentCreateResponse;
    type UpdateResponse = StudentResponse;
}

/// Confirmation returned by delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteReceipt {
    pub ok: bool,
    /// Epoch ms at which the delete was confirmed.
    pub deleted_at: i64,
}

/// Service façade for record kind `R`.
pub struct RecordService<R, P> {
    repo: Repository<R, P>,
}

/// Student service over any session provider.
pub type StudentService<P> = RecordService<Student, P>;

impl<R: Projected, P: SessionProvider> RecordService<R, P> {
    pub fn new(repo: Repository<R, P>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository<R, P> {
        &self.repo
    }

    /// Gets one record. Absence is `ServiceError::NotFound`.
    pub fn get_by_id(&self, id: RecordId) -> ServiceResult<R::Response> {
        let record = self.repo.read_by_id(id)?;
        to_response::<R, R::Response>(record.as_ref()).ok_or_else(|| {
            warn!(
                "event=service_get module=service status=not_found table={} id={}",
                R::TABLE,
                id
            );
            ServiceError::NotFound {
                label: R::LABEL,
                id,
            }
        })
    }

    /// Lists one page in natural storage order.
    pub fn list(&self, offset: u32, limit: NonZeroU32) -> ServiceResult<Vec<R::Response>> {
        let records = self.repo.read_many(offset, limit)?;
        Ok(records.iter().map(R::Response::from).collect())
    }

    pub fn create(&self, draft: &R::Draft) -> ServiceResult<R::CreateResponse> {
        let created = self.repo.create(draft)?;
        Ok(R::CreateResponse::from(&created))
    }

    /// Applies a partial update. `None` only if the row vanished between the
    /// write and the read-back.
    pub fn update(
        &self,
        id: RecordId,
        patch: &R::Patch,
    ) -> ServiceResult<Option<R::UpdateResponse>> {
        let updated = self.repo.update(id, patch)?;
        Ok(to_response::<R, R::UpdateResponse>(updated.as_ref()))
    }

    pub fn delete(&self, id: RecordId) -> ServiceResult<DeleteReceipt> {
        self.repo.delete(id)?;
        Ok(DeleteReceipt {
            ok: true,
            deleted_at: now_epoch_ms(),
        })
    }
}

use crate::db::{Chirp, ChirpId, UserId};
use crate::error::{AppError, AuthError, ErrorContext, ValidationError};
use crate::validators::validate_chirp;

use super::Workflow;

/// Listing order, by chirp id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Missing means ascending. Anything but "asc"/"desc" is rejected.
    pub fn parse(value: Option<&str>) -> Result<Self, ValidationError> {
        match value {
            None | Some("asc") => Ok(SortOrder::Asc),
            Some("desc") => Ok(SortOrder::Desc),
            Some(_) => Err(ValidationError::InvalidFormat("sort".to_string())),
        }
    }
}

impl Workflow {
    /// Post a chirp as the user the access token belongs to.
    ///
    /// # Errors
    /// - 401: invalid access token
    /// - 400: body too long
    /// - 404: author no longer exists
    pub fn create_chirp(&self, access_token: &str, body: &str) -> Result<Chirp, AppError> {
        ErrorContext::new("create_chirp").run(|| {
            let author_id = self.authenticate(access_token)?;
            let body = validate_chirp(body, &self.chirps)?;

            let chirp = self.db.mutate(|snapshot| {
                if !snapshot.users.contains_key(&author_id) {
                    return Err(AppError::not_found(format!("user {}", author_id)));
                }
                Ok(snapshot.insert_chirp(author_id, body))
            })?;

            tracing::info!(chirp_id = chirp.id, author_id = author_id, "Chirp created");
            Ok(chirp)
        })
    }

    pub fn list_chirps(
        &self,
        author_id: Option<UserId>,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, AppError> {
        let mut chirps = self.db.read(|snapshot| {
            snapshot
                .chirps
                .values()
                .filter(|c| author_id.map_or(true, |id| c.author_id == id))
                .cloned()
                .collect::<Vec<_>>()
        })?;

        // BTreeMap iteration is already ascending by id
        if order == SortOrder::Desc {
            chirps.reverse();
        }

        Ok(chirps)
    }

    pub fn get_chirp(&self, id: ChirpId) -> Result<Chirp, AppError> {
        self.db
            .read(|snapshot| snapshot.chirps.get(&id).cloned())?
            .ok_or_else(|| AppError::not_found(format!("chirp {}", id)))
    }

    /// Delete a chirp. Only its author may.
    ///
    /// # Errors
    /// - 401: invalid access token
    /// - 404: no such chirp
    /// - 403: caller is not the author
    pub fn delete_chirp(&self, access_token: &str, id: ChirpId) -> Result<(), AppError> {
        ErrorContext::new("delete_chirp").run(|| {
            let user_id = self.authenticate(access_token)?;

            self.db.mutate(|snapshot| {
                let chirp = snapshot
                    .chirps
                    .get(&id)
                    .ok_or_else(|| AppError::not_found(format!("chirp {}", id)))?;
                if chirp.author_id != user_id {
                    return Err(AuthError::Forbidden.into());
                }
                snapshot.chirps.remove(&id);
                Ok(())
            })?;

            tracing::info!(chirp_id = id, user_id = user_id, "Chirp deleted");
            Ok(())
        })
    }
}

use catalog::{User, UserUpdate, normalize_email};
use chrono::Utc;
use tracing::{debug, info};

use crate::{
    database::{Collection, DocumentStore, StoreError, find_one},
    error::AppError,
};

const UPSERT_ATTEMPTS: usize = 8;

pub async fn get_user(store: &dyn DocumentStore, email: &str) -> Result<User, AppError> {
    find_one(store, Collection::Users, &normalize_email(email))
        .await?
        .ok_or(AppError::NotFound("User not found"))
}

/// Updates the provided fields of an existing profile, or creates one with
/// defaults for the rest. The lower-cased path email is the key either way.
///
/// The write only lands if the stored profile is unchanged since the read.
/// A concurrent writer wins the race and this update is re-applied on top
/// of its result, so one email never ends up with two ids.
pub async fn upsert_user(
    store: &dyn DocumentStore,
    email: &str,
    update: UserUpdate,
) -> Result<User, AppError> {
    let key = normalize_email(email);
    if key.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }
    update.ensure_key(&key)?;

    for attempt in 1..=UPSERT_ATTEMPTS {
        let current = store.get(Collection::Users, &key).await?;

        let now = Utc::now();
        let user = match &current {
            Some(document) => {
                let mut user: User = serde_json::from_str(document).map_err(StoreError::from)?;
                update.clone().apply(&mut user, now);
                user
            }
            None => update.clone().create(key.clone(), now),
        };

        let document = serde_json::to_string(&user).map_err(StoreError::from)?;
        if store
            .swap(Collection::Users, &key, current.as_deref(), document)
            .await?
        {
            if current.is_none() {
                info!("Created profile for {key}");
            }

            return Ok(user);
        }

        debug!("Profile {key} changed underneath, retrying ({attempt}/{UPSERT_ATTEMPTS})");
    }

    Err(StoreError::Conflict {
        collection: Collection::Users.key(),
        key,
        attempts: UPSERT_ATTEMPTS,
    }
    .into())
}

//! SeaORM repository implementations

use crate::contract::{
    AppointmentData, CaseData, ClientData, DocumentData, Profile, Record, TaskData,
};
use crate::domain::repository::{OwnedRepository, ProfileRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{appointments, cases, clients, documents, profiles, tasks};
use super::mapper::profile_active_model;

/// Implements [`OwnedRepository`] for one owner-scoped table
macro_rules! owned_repository {
    ($(#[$meta:meta])* $repo:ident, $data:ty, $table:ident) => {
        $(#[$meta])*
        pub struct $repo {
            db: Arc<DatabaseConnection>,
        }

        impl $repo {
            pub fn new(db: Arc<DatabaseConnection>) -> Self {
                Self { db }
            }
        }

        #[async_trait]
        impl OwnedRepository<$data> for $repo {
            async fn insert(&self, record: &Record<$data>) -> Result<Record<$data>> {
                let now = Utc::now();
                let mut active = $table::ActiveModel::try_from(record)?;
                active.created_at = Set(now);
                active.updated_at = Set(now);
                let model = active.insert(&*self.db).await?;
                model.try_into()
            }

            async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<Record<$data>>> {
                $table::Entity::find_by_id(id)
                    .filter($table::Column::UserId.eq(owner))
                    .one(&*self.db)
                    .await?
                    .map(Record::<$data>::try_from)
                    .transpose()
            }

            async fn list(&self, owner: Uuid) -> Result<Vec<Record<$data>>> {
                $table::Entity::find()
                    .filter($table::Column::UserId.eq(owner))
                    .order_by_desc($table::Column::CreatedAt)
                    .order_by_desc($table::Column::Id)
                    .all(&*self.db)
                    .await?
                    .into_iter()
                    .map(Record::<$data>::try_from)
                    .collect()
            }

            async fn update(&self, record: &Record<$data>) -> Result<Option<Record<$data>>> {
                let mut active = $table::ActiveModel::try_from(record)?;
                active.user_id = NotSet;
                active.created_at = NotSet;
                active.updated_at = Set(Utc::now());
                match $table::Entity::update(active)
                    .filter($table::Column::UserId.eq(record.user_id))
                    .exec(&*self.db)
                    .await
                {
                    Ok(model) => Ok(Some(model.try_into()?)),
                    Err(DbErr::RecordNotUpdated) => Ok(None),
                    Err(err) => Err(err.into()),
                }
            }

            async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool> {
                let result = $table::Entity::delete_many()
                    .filter($table::Column::Id.eq(id))
                    .filter($table::Column::UserId.eq(owner))
                    .exec(&*self.db)
                    .await?;
                Ok(result.rows_affected > 0)
            }
        }
    };
}

owned_repository!(
    /// Clients table repository
    SeaOrmClientRepository,
    ClientData,
    clients
);
owned_repository!(
    /// Cases table repository
    SeaOrmCaseRepository,
    CaseData,
    cases
);
owned_repository!(
    /// Documents table repository
    SeaOrmDocumentRepository,
    DocumentData,
    documents
);
owned_repository!(SeaOrmTaskRepository, TaskData, tasks);
owned_repository!(SeaOrmAppointmentRepository, AppointmentData, appointments);

// ===== Profile Repository =====

pub struct SeaOrmProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmProfileRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn create(&self, profile: &Profile, password_hash: &str) -> Result<Profile> {
        let now = Utc::now();
        let mut active = profile_active_model(profile, password_hash);
        active.created_at = Set(now);
        active.updated_at = Set(now);
        Ok(active.insert(&*self.db).await?.into())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Profile>> {
        let result = profiles::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Profile::from))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<(Profile, String)>> {
        let result = profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email.trim().to_lowercase()))
            .one(&*self.db)
            .await?;
        Ok(result.map(|model| {
            let hash = model.password_hash.clone();
            (Profile::from(model), hash)
        }))
    }

    async fn update(&self, profile: &Profile) -> Result<Option<Profile>> {
        let active = profiles::ActiveModel {
            id: Set(profile.id),
            full_name: Set(profile.full_name.clone()),
            role: Set(profile.role.clone()),
            phone: Set(profile.phone.clone()),
            bar_number: Set(profile.bar_number.clone()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        match active.update(&*self.db).await {
            Ok(model) => Ok(Some(model.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

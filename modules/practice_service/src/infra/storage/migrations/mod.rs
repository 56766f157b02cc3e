//! Database migrations for the practice service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_profiles::Migration),
            Box::new(m20250301_000002_create_clients::Migration),
            Box::new(m20250301_000003_create_cases::Migration),
            Box::new(m20250301_000004_create_documents::Migration),
            Box::new(m20250301_000005_create_tasks::Migration),
            Box::new(m20250301_000006_create_appointments::Migration),
        ]
    }
}

fn timestamps(
    table: &mut TableCreateStatement,
    created: impl IntoIden + 'static,
    updated: impl IntoIden + 'static,
) {
    table
        .col(
            ColumnDef::new(created)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(updated)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        );
}

/// Owner index shared by every owner-scoped table
async fn owner_index(
    manager: &SchemaManager<'_>,
    name: &str,
    table: impl IntoIden + 'static,
    column: impl IntoIden + 'static,
) -> Result<(), DbErr> {
    manager
        .create_index(
            Index::create()
                .name(name)
                .table(table)
                .col(column)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

mod m20250301_000001_create_profiles {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_profiles"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create();
            table
                .table(Profiles::Table)
                .if_not_exists()
                .col(ColumnDef::new(Profiles::Id).uuid().not_null().primary_key())
                .col(
                    ColumnDef::new(Profiles::Email)
                        .string()
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Profiles::PasswordHash).string().not_null())
                .col(ColumnDef::new(Profiles::FullName).string().not_null())
                .col(ColumnDef::new(Profiles::Role).string())
                .col(ColumnDef::new(Profiles::Phone).string())
                .col(ColumnDef::new(Profiles::BarNumber).string());
            timestamps(&mut table, Profiles::CreatedAt, Profiles::UpdatedAt);
            manager.create_table(table.to_owned()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Profiles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Profiles {
        Table,
        Id,
        Email,
        PasswordHash,
        FullName,
        Role,
        Phone,
        BarNumber,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000002_create_clients {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_clients"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create();
            table
                .table(Clients::Table)
                .if_not_exists()
                .col(ColumnDef::new(Clients::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Clients::UserId).uuid().not_null())
                .col(ColumnDef::new(Clients::Name).string().not_null())
                .col(ColumnDef::new(Clients::Email).string())
                .col(ColumnDef::new(Clients::Phone).string())
                .col(ColumnDef::new(Clients::DocumentNumber).string())
                .col(ColumnDef::new(Clients::Address).text())
                .col(ColumnDef::new(Clients::Notes).text())
                .col(
                    ColumnDef::new(Clients::ClientType)
                        .string()
                        .not_null()
                        .default("individual"),
                )
                .col(
                    ColumnDef::new(Clients::Status)
                        .string()
                        .not_null()
                        .default("active"),
                );
            timestamps(&mut table, Clients::CreatedAt, Clients::UpdatedAt);
            manager.create_table(table.to_owned()).await?;
            owner_index(manager, "idx_clients_user_id", Clients::Table, Clients::UserId).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Clients {
        Table,
        Id,
        UserId,
        Name,
        Email,
        Phone,
        DocumentNumber,
        Address,
        Notes,
        ClientType,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000003_create_cases {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_cases"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create();
            table
                .table(Cases::Table)
                .if_not_exists()
                .col(ColumnDef::new(Cases::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Cases::UserId).uuid().not_null())
                .col(ColumnDef::new(Cases::ClientId).uuid().not_null())
                .col(ColumnDef::new(Cases::Title).string().not_null())
                .col(ColumnDef::new(Cases::CaseNumber).string())
                .col(ColumnDef::new(Cases::Description).text())
                .col(
                    ColumnDef::new(Cases::Status)
                        .string()
                        .not_null()
                        .default("open"),
                )
                .col(
                    ColumnDef::new(Cases::Priority)
                        .string()
                        .not_null()
                        .default("medium"),
                )
                .col(ColumnDef::new(Cases::ValueCents).big_integer())
                .col(ColumnDef::new(Cases::Court).string())
                .col(ColumnDef::new(Cases::Judge).string())
                .col(ColumnDef::new(Cases::StartDate).date())
                .col(ColumnDef::new(Cases::EndDate).date());
            timestamps(&mut table, Cases::CreatedAt, Cases::UpdatedAt);
            manager.create_table(table.to_owned()).await?;
            owner_index(manager, "idx_cases_user_id", Cases::Table, Cases::UserId).await?;
            manager
                .create_index(
                    Index::create()
                        .name("idx_cases_client_id")
                        .table(Cases::Table)
                        .col(Cases::ClientId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Cases::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Cases {
        Table,
        Id,
        UserId,
        ClientId,
        Title,
        CaseNumber,
        Description,
        Status,
        Priority,
        ValueCents,
        Court,
        Judge,
        StartDate,
        EndDate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000004_create_documents {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_documents"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create();
            table
                .table(Documents::Table)
                .if_not_exists()
                .col(ColumnDef::new(Documents::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Documents::UserId).uuid().not_null())
                .col(ColumnDef::new(Documents::CaseId).uuid())
                .col(ColumnDef::new(Documents::ClientId).uuid())
                .col(ColumnDef::new(Documents::Name).string().not_null())
                .col(ColumnDef::new(Documents::FilePath).string().not_null())
                .col(ColumnDef::new(Documents::FileSize).big_integer().not_null())
                .col(ColumnDef::new(Documents::MimeType).string())
                .col(ColumnDef::new(Documents::DocumentType).string())
                .col(
                    ColumnDef::new(Documents::Status)
                        .string()
                        .not_null()
                        .default("draft"),
                )
                .col(
                    ColumnDef::new(Documents::Encrypted)
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .col(ColumnDef::new(Documents::EncryptionRef).string());
            timestamps(&mut table, Documents::CreatedAt, Documents::UpdatedAt);
            manager.create_table(table.to_owned()).await?;
            owner_index(
                manager,
                "idx_documents_user_id",
                Documents::Table,
                Documents::UserId,
            )
            .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Documents::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Documents {
        Table,
        Id,
        UserId,
        CaseId,
        ClientId,
        Name,
        FilePath,
        FileSize,
        MimeType,
        DocumentType,
        Status,
        Encrypted,
        EncryptionRef,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000005_create_tasks {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000005_create_tasks"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create();
            table
                .table(Tasks::Table)
                .if_not_exists()
                .col(ColumnDef::new(Tasks::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Tasks::UserId).uuid().not_null())
                .col(ColumnDef::new(Tasks::CaseId).uuid())
                .col(ColumnDef::new(Tasks::ClientId).uuid())
                .col(ColumnDef::new(Tasks::AssignedTo).uuid())
                .col(ColumnDef::new(Tasks::Title).string().not_null())
                .col(ColumnDef::new(Tasks::Description).text())
                .col(
                    ColumnDef::new(Tasks::Status)
                        .string()
                        .not_null()
                        .default("pending"),
                )
                .col(
                    ColumnDef::new(Tasks::Priority)
                        .string()
                        .not_null()
                        .default("medium"),
                )
                .col(ColumnDef::new(Tasks::DueDate).date());
            timestamps(&mut table, Tasks::CreatedAt, Tasks::UpdatedAt);
            manager.create_table(table.to_owned()).await?;
            owner_index(manager, "idx_tasks_user_id", Tasks::Table, Tasks::UserId).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tasks::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Tasks {
        Table,
        Id,
        UserId,
        CaseId,
        ClientId,
        AssignedTo,
        Title,
        Description,
        Status,
        Priority,
        DueDate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000006_create_appointments {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000006_create_appointments"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create();
            table
                .table(Appointments::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Appointments::Id)
                        .uuid()
                        .not_null()
                        .primary_key(),
                )
                .col(ColumnDef::new(Appointments::UserId).uuid().not_null())
                .col(ColumnDef::new(Appointments::CaseId).uuid())
                .col(ColumnDef::new(Appointments::ClientId).uuid())
                .col(ColumnDef::new(Appointments::Title).string().not_null())
                .col(ColumnDef::new(Appointments::Description).text())
                .col(ColumnDef::new(Appointments::Location).string())
                .col(ColumnDef::new(Appointments::Date).date().not_null())
                .col(ColumnDef::new(Appointments::StartTime).time().not_null())
                .col(ColumnDef::new(Appointments::EndTime).time())
                .col(ColumnDef::new(Appointments::AppointmentType).string())
                .col(
                    ColumnDef::new(Appointments::Status)
                        .string()
                        .not_null()
                        .default("scheduled"),
                );
            timestamps(&mut table, Appointments::CreatedAt, Appointments::UpdatedAt);
            manager.create_table(table.to_owned()).await?;
            owner_index(
                manager,
                "idx_appointments_user_id",
                Appointments::Table,
                Appointments::UserId,
            )
            .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Appointments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Appointments {
        Table,
        Id,
        UserId,
        CaseId,
        ClientId,
        Title,
        Description,
        Location,
        Date,
        StartTime,
        EndTime,
        AppointmentType,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectOptions, Database};
    use std::collections::HashSet;

    #[test]
    fn test_migration_names_are_unique() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len(), "duplicate names: {names:?}");
        assert!(names.iter().all(|name| name.starts_with("m2025")));
    }

    #[tokio::test]
    async fn test_up_on_fresh_sqlite_database() {
        // one connection, otherwise each pooled connection sees its own empty database
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let applied = Migrator::get_applied_migrations(&db).await.unwrap();
        assert_eq!(applied.len(), Migrator::migrations().len());

        // running again is a no-op
        Migrator::up(&db, None).await.unwrap();
    }
}

//! Create pakar application table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PakarApplication::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PakarApplication::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PakarApplication::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PakarApplication::Field)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PakarApplication::Description).text().not_null())
                    .col(
                        ColumnDef::new(PakarApplication::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(PakarApplication::ReviewedBy).string_len(32))
                    .col(ColumnDef::new(PakarApplication::ReviewNote).text())
                    .col(
                        ColumnDef::new(PakarApplication::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(PakarApplication::ReviewedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pakar_application_user")
                            .from(PakarApplication::Table, PakarApplication::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pakar_application_reviewer")
                            .from(PakarApplication::Table, PakarApplication::ReviewedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, status) (for the one-pending-application rule)
        manager
            .create_index(
                Index::create()
                    .name("idx_pakar_application_user_status")
                    .table(PakarApplication::Table)
                    .col(PakarApplication::UserId)
                    .col(PakarApplication::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PakarApplication::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PakarApplication {
    Table,
    Id,
    UserId,
    Field,
    Description,
    Status,
    ReviewedBy,
    ReviewNote,
    CreatedAt,
    ReviewedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

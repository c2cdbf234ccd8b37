//! Create discussion/answer/comment report tables migration.
//!
//! The three tables share one layout and differ only in the target column.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (report table, target column, target table)
const REPORT_TABLES: [(&str, &str, &str); 3] = [
    ("discussion_report", "discussion_id", "discussion"),
    ("answer_report", "answer_id", "answer"),
    ("comment_report", "comment_id", "comment"),
];

fn report_table(table: &str, target_column: &str, target_table: &str) -> TableCreateStatement {
    Table::create()
        .table(Alias::new(table))
        .if_not_exists()
        .col(
            ColumnDef::new(Report::Id)
                .string_len(32)
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Report::ReporterId).string_len(32).not_null())
        .col(
            ColumnDef::new(Alias::new(target_column))
                .string_len(32)
                .not_null(),
        )
        .col(ColumnDef::new(Report::Reason).text().not_null())
        .col(ColumnDef::new(Report::Priority).small_integer())
        .col(
            ColumnDef::new(Report::Status)
                .string_len(16)
                .not_null()
                .default("pending"),
        )
        .col(
            ColumnDef::new(Report::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(Report::ResolvedAt).timestamp_with_time_zone())
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_reporter"))
                .from(Alias::new(table), Report::ReporterId)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_target"))
                .from(Alias::new(table), Alias::new(target_column))
                .to(Alias::new(target_table), Alias::new("id"))
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, target_column, target_table) in REPORT_TABLES {
            manager
                .create_table(report_table(table, target_column, target_table))
                .await?;

            // Index: (status, priority) (for the moderation queue)
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{table}_status_priority"))
                        .table(Alias::new(table))
                        .col(Report::Status)
                        .col(Report::Priority)
                        .to_owned(),
                )
                .await?;

            // Index: (reporter_id, target) (for duplicate report checks)
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{table}_reporter_target"))
                        .table(Alias::new(table))
                        .col(Report::ReporterId)
                        .col(Alias::new(target_column))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, _, _) in REPORT_TABLES {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Report {
    Id,
    ReporterId,
    Reason,
    Priority,
    Status,
    CreatedAt,
    ResolvedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

//! Create moderation and reputation tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Moderation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Moderation::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Moderation::ModeratorId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Moderation::Action).string_len(16).not_null())
                    .col(ColumnDef::new(Moderation::Source).string_len(16).not_null())
                    .col(ColumnDef::new(Moderation::Note).text())
                    .col(ColumnDef::new(Moderation::DiscussionReportId).string_len(32))
                    .col(ColumnDef::new(Moderation::AnswerReportId).string_len(32))
                    .col(ColumnDef::new(Moderation::CommentReportId).string_len(32))
                    .col(
                        ColumnDef::new(Moderation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moderation_moderator")
                            .from(Moderation::Table, Moderation::ModeratorId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moderation_discussion_report")
                            .from(Moderation::Table, Moderation::DiscussionReportId)
                            .to(DiscussionReport::Table, DiscussionReport::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moderation_answer_report")
                            .from(Moderation::Table, Moderation::AnswerReportId)
                            .to(AnswerReport::Table, AnswerReport::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moderation_comment_report")
                            .from(Moderation::Table, Moderation::CommentReportId)
                            .to(CommentReport::Table, CommentReport::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Exactly one report reference per decision
        manager
            .get_connection()
            .execute_unprepared(
                r"ALTER TABLE moderation ADD CONSTRAINT chk_moderation_single_report CHECK (
                    (discussion_report_id IS NOT NULL)::int
                    + (answer_report_id IS NOT NULL)::int
                    + (comment_report_id IS NOT NULL)::int = 1
                )",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reputation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reputation::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reputation::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Reputation::Delta).integer().not_null())
                    .col(ColumnDef::new(Reputation::Reason).string_len(64).not_null())
                    .col(ColumnDef::new(Reputation::Source).string_len(16).not_null())
                    .col(ColumnDef::new(Reputation::ModerationId).string_len(32))
                    .col(
                        ColumnDef::new(Reputation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reputation_user")
                            .from(Reputation::Table, Reputation::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reputation_moderation")
                            .from(Reputation::Table, Reputation::ModerationId)
                            .to(Moderation::Table, Moderation::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for score sums)
        manager
            .create_index(
                Index::create()
                    .name("idx_reputation_user_id")
                    .table(Reputation::Table)
                    .col(Reputation::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reputation::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Moderation::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Moderation {
    Table,
    Id,
    ModeratorId,
    Action,
    Source,
    Note,
    DiscussionReportId,
    AnswerReportId,
    CommentReportId,
    CreatedAt,
}

#[derive(Iden)]
enum Reputation {
    Table,
    Id,
    UserId,
    Delta,
    Reason,
    Source,
    ModerationId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum DiscussionReport {
    Table,
    Id,
}

#[derive(Iden)]
enum AnswerReport {
    Table,
    Id,
}

#[derive(Iden)]
enum CommentReport {
    Table,
    Id,
}

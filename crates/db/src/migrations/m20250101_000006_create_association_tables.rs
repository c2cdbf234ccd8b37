//! Create vote and bookmark tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (table, target column, target table, has value column)
const ASSOCIATION_TABLES: [(&str, &str, &str, bool); 5] = [
    ("discussion_vote", "discussion_id", "discussion", true),
    ("answer_vote", "answer_id", "answer", true),
    ("comment_vote", "comment_id", "comment", true),
    ("discussion_bookmark", "discussion_id", "discussion", false),
    ("answer_bookmark", "answer_id", "answer", false),
];

fn association_table(
    table: &str,
    target_column: &str,
    target_table: &str,
    with_value: bool,
) -> TableCreateStatement {
    let mut stmt = Table::create();
    stmt.table(Alias::new(table))
        .if_not_exists()
        .col(
            ColumnDef::new(Association::Id)
                .string_len(32)
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Association::UserId).string_len(32).not_null())
        .col(
            ColumnDef::new(Alias::new(target_column))
                .string_len(32)
                .not_null(),
        )
        .col(
            ColumnDef::new(Association::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_user"))
                .from(Alias::new(table), Association::UserId)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_target"))
                .from(Alias::new(table), Alias::new(target_column))
                .to(Alias::new(target_table), Alias::new("id"))
                .on_delete(ForeignKeyAction::Cascade),
        );

    if with_value {
        stmt.col(ColumnDef::new(Association::Value).small_integer().not_null());
    }

    stmt.to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, target_column, target_table, with_value) in ASSOCIATION_TABLES {
            manager
                .create_table(association_table(
                    table,
                    target_column,
                    target_table,
                    with_value,
                ))
                .await?;

            // Unique: one row per (user, target); upserts conflict on this
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{table}_user_target"))
                        .table(Alias::new(table))
                        .col(Association::UserId)
                        .col(Alias::new(target_column))
                        .unique()
                        .to_owned(),
                )
                .await?;

            // Index: target (for tallies)
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{table}_target"))
                        .table(Alias::new(table))
                        .col(Alias::new(target_column))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, _, _, _) in ASSOCIATION_TABLES {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Association {
    Id,
    UserId,
    Value,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

use sea_orm_migration::prelude::*;

use crate::m20261001_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrdersPacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrdersPacks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrdersPacks::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(OrdersPacks::ExpirationDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrdersPacks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(OrdersPacks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_packs_owner_id")
                            .from(OrdersPacks::Table, OrdersPacks::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The owner's pack list is read ordered by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_packs_owner_created")
                    .table(OrdersPacks::Table)
                    .col(OrdersPacks::OwnerId)
                    .col(OrdersPacks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrdersPacks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum OrdersPacks {
    Table,
    Id,
    OwnerId,
    ExpirationDate,
    CreatedAt,
    UpdatedAt,
}

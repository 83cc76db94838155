//! Ordered reference lists: orders owned by a user, orders held by a pack.
//!
//! The auto-increment id doubles as the list position.

use sea_orm_migration::prelude::*;

use crate::m20261001_000001_create_users::Users;
use crate::m20261001_000002_create_orders_packs::OrdersPacks;
use crate::m20261001_000003_create_orders::Orders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserOrders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserOrders::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserOrders::OrderId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_orders_user_id")
                            .from(UserOrders::Table, UserOrders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_orders_order_id")
                            .from(UserOrders::Table, UserOrders::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_orders_user_order")
                    .table(UserOrders::Table)
                    .col(UserOrders::UserId)
                    .col(UserOrders::OrderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrdersPackOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrdersPackOrders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OrdersPackOrders::OrdersPackId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrdersPackOrders::OrderId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_pack_orders_pack_id")
                            .from(OrdersPackOrders::Table, OrdersPackOrders::OrdersPackId)
                            .to(OrdersPacks::Table, OrdersPacks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_pack_orders_order_id")
                            .from(OrdersPackOrders::Table, OrdersPackOrders::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_pack_orders_pack_order")
                    .table(OrdersPackOrders::Table)
                    .col(OrdersPackOrders::OrdersPackId)
                    .col(OrdersPackOrders::OrderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrdersPackOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserOrders {
    Table,
    Id,
    UserId,
    OrderId,
}

#[derive(DeriveIden)]
enum OrdersPackOrders {
    Table,
    Id,
    OrdersPackId,
    OrderId,
}

//! SeaORM-backed repositories over PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{
    OrderRepository, OrdersPackRepository, RepoResult, RepositoryError, UserRepository,
};
use crate::entities::{
    orders, orders_pack_orders, orders_packs, prelude::*, user_orders, users,
};
use crate::models::{
    order::{Order, PaymentMethod},
    orders_pack::{OrderRef, OrdersPack},
    user::User,
};

fn order_from_model(model: orders::Model) -> RepoResult<Order> {
    let payment_method = model
        .payment_method
        .parse::<PaymentMethod>()
        .map_err(|e| RepositoryError::Corrupt {
            entity: "order",
            id: model.id,
            reason: e.to_string(),
        })?;

    Ok(Order {
        id: model.id,
        description: model.description,
        price: model.price,
        payed: model.payed,
        payment_method,
        user_id: model.user_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn order_active_model(order: &Order) -> orders::ActiveModel {
    orders::ActiveModel {
        id: Set(order.id),
        description: Set(order.description.clone()),
        price: Set(order.price),
        payed: Set(order.payed),
        payment_method: Set(order.payment_method.as_str().to_string()),
        user_id: Set(order.user_id),
        created_at: Set(order.created_at),
        updated_at: Set(order.updated_at),
    }
}

pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let Some(model) = Users::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let orders: Vec<Uuid> = UserOrders::find()
            .select_only()
            .column(user_orders::Column::OrderId)
            .filter(user_orders::Column::UserId.eq(id))
            .order_by_asc(user_orders::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;

        let orders_packs: Vec<Uuid> = OrdersPacks::find()
            .select_only()
            .column(orders_packs::Column::Id)
            .filter(orders_packs::Column::OwnerId.eq(id))
            .order_by_asc(orders_packs::Column::CreatedAt)
            .order_by_asc(orders_packs::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(Some(User {
            id: model.id,
            name: model.name,
            email: model.email,
            password: model.password,
            orders,
            orders_packs,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }))
    }

    async fn save(&self, user: User) -> RepoResult<User> {
        users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password: Set(user.password.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await?;

        for order_id in &user.orders {
            self.add_order(user.id, *order_id).await?;
        }

        Ok(user)
    }

    async fn add_order(&self, user_id: Uuid, order_id: Uuid) -> RepoResult<()> {
        let reference = user_orders::ActiveModel {
            user_id: Set(user_id),
            order_id: Set(order_id),
            ..Default::default()
        };

        UserOrders::insert(reference)
            .on_conflict(
                OnConflict::columns([user_orders::Column::UserId, user_orders::Column::OrderId])
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(&self.db)
            .await?;

        Ok(())
    }

    async fn delete_order(&self, user_id: Uuid, order_id: Uuid) -> RepoResult<()> {
        UserOrders::delete_many()
            .filter(user_orders::Column::UserId.eq(user_id))
            .filter(user_orders::Column::OrderId.eq(order_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn all_ids(&self) -> RepoResult<Vec<Uuid>> {
        let ids = Users::find()
            .select_only()
            .column(users::Column::Id)
            .order_by_asc(users::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids)
    }
}

pub struct PgOrdersPackRepository {
    db: DatabaseConnection,
}

impl PgOrdersPackRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrdersPackRepository for PgOrdersPackRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<OrdersPack>> {
        let Some(model) = OrdersPacks::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let orders = OrdersPackOrders::find()
            .filter(orders_pack_orders::Column::OrdersPackId.eq(id))
            .order_by_asc(orders_pack_orders::Column::Id)
            .find_also_related(Orders)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(reference, order)| OrderRef {
                id: reference.order_id,
                user_id: order.map(|o| o.user_id),
            })
            .collect();

        Ok(Some(OrdersPack {
            id: model.id,
            owner_id: model.owner_id,
            expiration_date: model.expiration_date,
            orders,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }))
    }

    async fn save(&self, orders_pack: OrdersPack) -> RepoResult<OrdersPack> {
        orders_packs::ActiveModel {
            id: Set(orders_pack.id),
            owner_id: Set(orders_pack.owner_id),
            expiration_date: Set(orders_pack.expiration_date),
            created_at: Set(orders_pack.created_at),
            updated_at: Set(orders_pack.updated_at),
        }
        .insert(&self.db)
        .await?;

        for order_id in orders_pack.order_ids() {
            self.add_order(orders_pack.id, order_id).await?;
        }

        Ok(orders_pack)
    }

    async fn add_order(&self, orders_pack_id: Uuid, order_id: Uuid) -> RepoResult<()> {
        let reference = orders_pack_orders::ActiveModel {
            orders_pack_id: Set(orders_pack_id),
            order_id: Set(order_id),
            ..Default::default()
        };

        OrdersPackOrders::insert(reference)
            .on_conflict(
                OnConflict::columns([
                    orders_pack_orders::Column::OrdersPackId,
                    orders_pack_orders::Column::OrderId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .do_nothing()
            .exec(&self.db)
            .await?;

        Ok(())
    }

    async fn delete_order(&self, orders_pack_id: Uuid, order_id: Uuid) -> RepoResult<()> {
        OrdersPackOrders::delete_many()
            .filter(orders_pack_orders::Column::OrdersPackId.eq(orders_pack_id))
            .filter(orders_pack_orders::Column::OrderId.eq(order_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn all_ids(&self) -> RepoResult<Vec<Uuid>> {
        let ids = OrdersPacks::find()
            .select_only()
            .column(orders_packs::Column::Id)
            .order_by_asc(orders_packs::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids)
    }
}

pub struct PgOrderRepository {
    db: DatabaseConnection,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Order>> {
        Orders::find_by_id(id)
            .one(&self.db)
            .await?
            .map(order_from_model)
            .transpose()
    }

    async fn save(&self, order: Order) -> RepoResult<Order> {
        let model = order_active_model(&order).insert(&self.db).await?;
        order_from_model(model)
    }

    async fn update(&self, order: Order) -> RepoResult<Order> {
        let model = order_active_model(&order).update(&self.db).await?;
        order_from_model(model)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let result = Orders::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn ids_created_before(&self, cutoff: DateTime<Utc>) -> RepoResult<Vec<Uuid>> {
        let ids = Orders::find()
            .select_only()
            .column(orders::Column::Id)
            .filter(orders::Column::CreatedAt.lt(cutoff))
            .order_by_asc(orders::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids)
    }
}

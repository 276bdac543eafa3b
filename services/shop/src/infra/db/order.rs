use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use oderly_domain::order::OrderStatus;
use oderly_domain::pagination::PageRequest;
use oderly_shop_schema::{cart_items, order_events, order_products, orders};

use super::cart::cart_item_from_model;
use crate::domain::repository::OrderRepository;
use crate::domain::types::{Order, OrderDetail, OrderDraft, OrderEvent, OrderFilter, OrderProduct};
use crate::error::ShopServiceError;

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn place(&self, draft: &OrderDraft) -> Result<(), ShopServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let draft = draft.clone();
                Box::pin(async move {
                    let order = &draft.order;
                    let current = cart_items::Entity::find()
                        .filter(cart_items::Column::UserId.eq(order.user_id))
                        .lock_exclusive()
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(cart_item_from_model)
                        .collect::<Vec<_>>();
                    if !draft.matches_cart(&current) {
                        return Err(DbErr::Custom(format!(
                            "cart of user {} changed since it was priced",
                            order.user_id
                        )));
                    }

                    orders::ActiveModel {
                        id: Set(order.id),
                        user_id: Set(order.user_id),
                        net_amount: Set(order.net_amount),
                        address: Set(order.address.clone()),
                        status: Set(order.status.as_str().to_owned()),
                        created_at: Set(order.created_at),
                        updated_at: Set(order.updated_at),
                    }
                    .insert(txn)
                    .await?;

                    order_products::Entity::insert_many(draft.products.iter().map(|line| {
                        order_products::ActiveModel {
                            id: Set(line.id),
                            order_id: Set(line.order_id),
                            product_id: Set(line.product_id),
                            quantity: Set(line.quantity),
                            unit_price: Set(line.unit_price),
                        }
                    }))
                    .exec(txn)
                    .await?;

                    insert_event(txn, &draft.event).await?;

                    let cleared = cart_items::Entity::delete_many()
                        .filter(cart_items::Column::UserId.eq(order.user_id))
                        .filter(cart_items::Column::Id.is_in(draft.cart_item_ids()))
                        .exec(txn)
                        .await?;
                    if cleared.rows_affected != draft.cart_items.len() as u64 {
                        return Err(DbErr::Custom(format!(
                            "cart of user {} changed during order placement: expected {} items, cleared {}",
                            order.user_id,
                            draft.cart_items.len(),
                            cleared.rows_affected
                        )));
                    }
                    Ok(())
                })
            })
            .await
            .context("place order")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, ShopServiceError> {
        let model = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order by id")?;
        Ok(model.map(order_from_model).transpose()?)
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetail>, ShopServiceError> {
        let Some(order) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let products = order_products::Entity::find()
            .filter(order_products::Column::OrderId.eq(id))
            .order_by_asc(order_products::Column::Id)
            .all(&self.db)
            .await
            .context("list order products")?
            .into_iter()
            .map(order_product_from_model)
            .collect();
        let events = order_events::Entity::find()
            .filter(order_events::Column::OrderId.eq(id))
            .order_by_asc(order_events::Column::CreatedAt)
            .order_by_asc(order_events::Column::Id)
            .all(&self.db)
            .await
            .context("list order events")?
            .into_iter()
            .map(order_event_from_model)
            .collect::<anyhow::Result<_>>()?;
        Ok(Some(OrderDetail {
            order,
            products,
            events,
        }))
    }

    async fn list(
        &self,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Vec<Order>, ShopServiceError> {
        let mut query = orders::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(orders::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(orders::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list orders")?;
        Ok(models
            .into_iter()
            .map(order_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<OrderEvent>, ShopServiceError> {
        let event = OrderEvent::new(id, to);
        let written = self
            .db
            .transaction::<_, Option<OrderEvent>, DbErr>(|txn| {
                Box::pin(async move {
                    let updated = orders::Entity::update_many()
                        .col_expr(orders::Column::Status, Expr::value(to.as_str()))
                        .col_expr(orders::Column::UpdatedAt, Expr::value(event.created_at))
                        .filter(orders::Column::Id.eq(id))
                        .filter(orders::Column::Status.eq(from.as_str()))
                        .exec(txn)
                        .await?;
                    if updated.rows_affected == 0 {
                        return Ok(None);
                    }
                    insert_event(txn, &event).await?;
                    Ok(Some(event))
                })
            })
            .await
            .context("transition order status")?;
        Ok(written)
    }
}

async fn insert_event<C: ConnectionTrait>(db: &C, event: &OrderEvent) -> Result<(), DbErr> {
    order_events::ActiveModel {
        id: Set(event.id),
        order_id: Set(event.order_id),
        status: Set(event.status.as_str().to_owned()),
        created_at: Set(event.created_at),
    }
    .insert(db)
    .await?;
    Ok(())
}

fn parse_status(raw: &str) -> anyhow::Result<OrderStatus> {
    raw.parse::<OrderStatus>()
        .with_context(|| format!("stored order status {raw:?}"))
}

fn order_from_model(model: orders::Model) -> anyhow::Result<Order> {
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        net_amount: model.net_amount,
        address: model.address,
        status: parse_status(&model.status)?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn order_product_from_model(model: order_products::Model) -> OrderProduct {
    OrderProduct {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        unit_price: model.unit_price,
    }
}

fn order_event_from_model(model: order_events::Model) -> anyhow::Result<OrderEvent> {
    Ok(OrderEvent {
        id: model.id,
        order_id: model.order_id,
        status: parse_status(&model.status)?,
        created_at: model.created_at,
    })
}

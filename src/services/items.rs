use crate::{
    db::{self, DbPool},
    entities::{alert, item, supplier},
    errors::{FieldError, ServiceError},
};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, Value,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// An item together with its supplier, if any.
pub type ItemWithSupplier = (item::Model, Option<supplier::Model>);

/// Input for creating an item. Optional fields fall back to defaults.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
    pub priority: Option<bool>,
    pub reorder_level: Option<i32>,
    pub supplier_id: Option<i32>,
}

/// Partial update. `None` keeps the stored value; the inner `None` of a
/// nullable column clears it.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<Option<String>>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
    pub priority: Option<bool>,
    pub reorder_level: Option<i32>,
    pub supplier_id: Option<Option<i32>>,
}

/// Result of a stock quantity change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    pub item_id: i32,
    pub item_name: String,
    pub old_quantity: i32,
    pub new_quantity: i32,
}

#[derive(Clone)]
pub struct ItemService {
    db_pool: Arc<DbPool>,
}

impl ItemService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists every item with its supplier, in id order
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<ItemWithSupplier>, ServiceError> {
        let db = &*self.db_pool;
        let items = item::Entity::find()
            .find_also_related(supplier::Entity)
            .order_by_asc(item::Column::Id)
            .all(db)
            .await?;
        Ok(items)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: i32) -> Result<ItemWithSupplier, ServiceError> {
        let db = &*self.db_pool;
        item::Entity::find_by_id(id)
            .find_also_related(supplier::Entity)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Item"))
    }

    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create_item(&self, input: NewItem) -> Result<ItemWithSupplier, ServiceError> {
        let db = &*self.db_pool;

        ensure_sku_available(db, &input.sku, None).await?;
        let supplier = match input.supplier_id {
            Some(supplier_id) => Some(find_supplier(db, supplier_id).await?),
            None => None,
        };

        let reorder_level = input.reorder_level.unwrap_or(item::DEFAULT_REORDER_LEVEL);
        check_stock_levels(Some(input.quantity), Some(reorder_level), Some(input.price))?;

        let model = item::ActiveModel {
            name: Set(input.name),
            sku: Set(input.sku),
            description: Set(input.description),
            quantity: Set(input.quantity),
            price: Set(input.price),
            priority: Set(input.priority.unwrap_or(false)),
            reorder_level: Set(reorder_level),
            supplier_id: Set(input.supplier_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| ServiceError::from_write(e, "sku"))?;

        info!(item_id = model.id, "Item created");
        Ok((model, supplier))
    }

    #[instrument(skip(self, changes))]
    pub async fn update_item(
        &self,
        id: i32,
        changes: ItemChanges,
    ) -> Result<ItemWithSupplier, ServiceError> {
        let db = &*self.db_pool;

        let existing = item::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Item"))?;

        if let Some(sku) = changes.sku.as_deref() {
            if sku != existing.sku {
                ensure_sku_available(db, sku, Some(id)).await?;
            }
        }
        if let Some(Some(supplier_id)) = changes.supplier_id {
            find_supplier(db, supplier_id).await?;
        }
        check_stock_levels(changes.quantity, changes.reorder_level, changes.price)?;

        let mut active: item::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(sku) = changes.sku {
            active.sku = Set(sku);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(quantity) = changes.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(priority) = changes.priority {
            active.priority = Set(priority);
        }
        if let Some(reorder_level) = changes.reorder_level {
            active.reorder_level = Set(reorder_level);
        }
        if let Some(supplier_id) = changes.supplier_id {
            active.supplier_id = Set(supplier_id);
        }

        let updated = active
            .update(db)
            .await
            .map_err(|e| ServiceError::from_write(e, "sku"))?;

        let supplier = updated.find_related(supplier::Entity).one(db).await?;
        info!(item_id = updated.id, "Item updated");
        Ok((updated, supplier))
    }

    /// Deletes an item; alerts that referenced it keep their item name but lose the link.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i32) -> Result<(), ServiceError> {
        db::transaction::<_, _, ServiceError>(&self.db_pool, "items.delete", move |txn| {
            Box::pin(async move {
                let existing = item::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Item"))?;

                alert::Entity::update_many()
                    .col_expr(alert::Column::ItemId, Expr::value(Value::Int(None)))
                    .filter(alert::Column::ItemId.eq(id))
                    .exec(txn)
                    .await?;

                existing.delete(txn).await?;
                Ok(())
            })
        })
        .await?;

        info!(item_id = id, "Item deleted");
        Ok(())
    }

    /// Sets the stored quantity of an item and reports the previous value
    #[instrument(skip(self))]
    pub async fn update_stock(
        &self,
        item_id: i32,
        quantity: i32,
    ) -> Result<StockChange, ServiceError> {
        let db = &*self.db_pool;

        let existing = item::Entity::find_by_id(item_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Item"))?;
        check_stock_levels(Some(quantity), None, None)?;

        let old_quantity = existing.quantity;
        let mut active: item::ActiveModel = existing.into();
        active.quantity = Set(quantity);
        let updated = active.update(db).await?;

        info!(
            item_id = updated.id,
            old_quantity,
            new_quantity = updated.quantity,
            "Stock updated"
        );

        Ok(StockChange {
            item_id: updated.id,
            item_name: updated.name,
            old_quantity,
            new_quantity: updated.quantity,
        })
    }
}

async fn ensure_sku_available<C: ConnectionTrait>(
    db: &C,
    sku: &str,
    except_id: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = item::Entity::find().filter(item::Column::Sku.eq(sku));
    if let Some(id) = except_id {
        query = query.filter(item::Column::Id.ne(id));
    }
    match query.one(db).await? {
        Some(_) => Err(ServiceError::AlreadyExists("sku".to_string())),
        None => Ok(()),
    }
}

async fn find_supplier<C: ConnectionTrait>(
    db: &C,
    supplier_id: i32,
) -> Result<supplier::Model, ServiceError> {
    supplier::Entity::find_by_id(supplier_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::invalid_field("supplierId", "Supplier does not exist"))
}

/// Persisted quantities, reorder levels and prices are never negative.
fn check_stock_levels(
    quantity: Option<i32>,
    reorder_level: Option<i32>,
    price: Option<Decimal>,
) -> Result<(), ServiceError> {
    let mut errors = Vec::new();
    if quantity.is_some_and(|q| q < 0) {
        errors.push(FieldError::new("quantity", "Quantity cannot be negative"));
    }
    if reorder_level.is_some_and(|r| r < 0) {
        errors.push(FieldError::new("reorderLevel", "Reorder level cannot be negative"));
    }
    if price.is_some_and(|p| p < Decimal::ZERO) {
        errors.push(FieldError::new("price", "Price cannot be negative"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(errors))
    }
}

use crate::{
    db::{self, DbPool},
    entities::{item, supplier, SupplierType},
    errors::ServiceError,
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, Value,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// A supplier together with the items it provides.
pub type SupplierWithItems = (supplier::Model, Vec<item::Model>);

#[derive(Debug, Clone)]
pub struct NewSupplier {
    pub name: String,
    pub supplier_type: Option<SupplierType>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SupplierChanges {
    pub name: Option<String>,
    pub supplier_type: Option<SupplierType>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub country: Option<Option<String>>,
}

/// Service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db_pool: Arc<DbPool>,
}

impl SupplierService {
    /// Creates a new supplier service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists all suppliers with their items
    #[instrument(skip(self))]
    pub async fn list_suppliers(&self) -> Result<Vec<SupplierWithItems>, ServiceError> {
        let db = &*self.db_pool;
        let suppliers = supplier::Entity::find()
            .find_with_related(item::Entity)
            .order_by_asc(supplier::Column::Id)
            .order_by_asc(item::Column::Id)
            .all(db)
            .await?;
        Ok(suppliers)
    }

    /// Gets a supplier by ID
    #[instrument(skip(self))]
    pub async fn get_supplier(&self, id: i32) -> Result<SupplierWithItems, ServiceError> {
        let db = &*self.db_pool;
        let supplier = supplier::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier"))?;

        let items = supplier
            .find_related(item::Entity)
            .order_by_asc(item::Column::Id)
            .all(db)
            .await?;

        Ok((supplier, items))
    }

    /// Creates a new supplier; the type defaults to General
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_supplier(
        &self,
        input: NewSupplier,
    ) -> Result<SupplierWithItems, ServiceError> {
        let db = &*self.db_pool;

        let model = supplier::ActiveModel {
            name: Set(input.name),
            supplier_type: Set(input.supplier_type.unwrap_or_default()),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            city: Set(input.city),
            country: Set(input.country),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(supplier_id = model.id, "Supplier created");
        Ok((model, Vec::new()))
    }

    /// Updates an existing supplier
    #[instrument(skip(self, changes))]
    pub async fn update_supplier(
        &self,
        id: i32,
        changes: SupplierChanges,
    ) -> Result<SupplierWithItems, ServiceError> {
        let db = &*self.db_pool;

        let existing = supplier::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier"))?;

        let mut active: supplier::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(supplier_type) = changes.supplier_type {
            active.supplier_type = Set(supplier_type);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = changes.address {
            active.address = Set(address);
        }
        if let Some(city) = changes.city {
            active.city = Set(city);
        }
        if let Some(country) = changes.country {
            active.country = Set(country);
        }

        let updated = active.update(db).await?;
        let items = updated
            .find_related(item::Entity)
            .order_by_asc(item::Column::Id)
            .all(db)
            .await?;

        info!(supplier_id = updated.id, "Supplier updated");
        Ok((updated, items))
    }

    /// Deletes a supplier; its items stay in place without a supplier.
    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, id: i32) -> Result<(), ServiceError> {
        db::transaction::<_, _, ServiceError>(&self.db_pool, "suppliers.delete", move |txn| {
            Box::pin(async move {
                let existing = supplier::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Supplier"))?;

                let detached = item::Entity::update_many()
                    .col_expr(item::Column::SupplierId, Expr::value(Value::Int(None)))
                    .filter(item::Column::SupplierId.eq(id))
                    .exec(txn)
                    .await?;

                existing.delete(txn).await?;
                info!(
                    supplier_id = id,
                    detached_items = detached.rows_affected,
                    "Supplier deleted"
                );
                Ok(())
            })
        })
        .await
    }
}

use crate::{
    db::DbPool,
    entities::{alert, item, AlertSeverity, AlertStatus, AlertType},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Select, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// An alert together with the item it points at, if still linked.
pub type AlertWithItem = (alert::Model, Option<item::Model>);

#[derive(Debug, Clone)]
pub struct NewAlert {
    pub item_name: String,
    pub item_id: Option<i32>,
    pub message: String,
    pub alert_type: Option<AlertType>,
    pub severity: Option<AlertSeverity>,
}

/// Optional equality filters for listing alerts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub status: Option<AlertStatus>,
    pub severity: Option<AlertSeverity>,
    pub alert_type: Option<AlertType>,
}

impl AlertFilter {
    fn apply(&self, mut query: Select<alert::Entity>) -> Select<alert::Entity> {
        if let Some(status) = self.status {
            query = query.filter(alert::Column::Status.eq(status));
        }
        if let Some(severity) = self.severity {
            query = query.filter(alert::Column::Severity.eq(severity));
        }
        if let Some(alert_type) = self.alert_type {
            query = query.filter(alert::Column::AlertType.eq(alert_type));
        }
        query
    }
}

#[derive(Clone)]
pub struct AlertService {
    db_pool: Arc<DbPool>,
}

impl AlertService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists alerts newest first
    #[instrument(skip(self))]
    pub async fn list_alerts(
        &self,
        filter: AlertFilter,
    ) -> Result<Vec<AlertWithItem>, ServiceError> {
        let db = &*self.db_pool;
        let alerts = filter
            .apply(alert::Entity::find())
            .find_also_related(item::Entity)
            .order_by_desc(alert::Column::CreatedAt)
            .order_by_desc(alert::Column::Id)
            .all(db)
            .await?;
        Ok(alerts)
    }

    #[instrument(skip(self))]
    pub async fn get_alert(&self, id: i32) -> Result<AlertWithItem, ServiceError> {
        let db = &*self.db_pool;
        alert::Entity::find_by_id(id)
            .find_also_related(item::Entity)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Alert"))
    }

    /// Creates an alert. New alerts are always Active.
    #[instrument(skip(self, input), fields(item_name = %input.item_name))]
    pub async fn create_alert(&self, input: NewAlert) -> Result<AlertWithItem, ServiceError> {
        let db = &*self.db_pool;

        let linked_item = match input.item_id {
            Some(item_id) => Some(
                item::Entity::find_by_id(item_id)
                    .one(db)
                    .await?
                    .ok_or_else(|| ServiceError::invalid_field("itemId", "Item does not exist"))?,
            ),
            None => None,
        };

        let model = alert::ActiveModel {
            item_name: Set(input.item_name),
            item_id: Set(input.item_id),
            message: Set(input.message),
            alert_type: Set(input.alert_type.unwrap_or_default()),
            status: Set(AlertStatus::Active),
            severity: Set(input.severity.unwrap_or_default()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(alert_id = model.id, "Alert created");
        Ok((model, linked_item))
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: i32,
        status: AlertStatus,
    ) -> Result<AlertWithItem, ServiceError> {
        let db = &*self.db_pool;

        let existing = alert::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Alert"))?;

        let mut active: alert::ActiveModel = existing.into();
        active.status = Set(status);
        let updated = active.update(db).await?;
        let linked_item = updated.find_related(item::Entity).one(db).await?;

        info!(alert_id = updated.id, status = ?updated.status, "Alert status updated");
        Ok((updated, linked_item))
    }

    #[instrument(skip(self))]
    pub async fn delete_alert(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let result = alert::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Alert"));
        }
        info!(alert_id = id, "Alert deleted");
        Ok(())
    }
}

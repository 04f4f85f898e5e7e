use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_suppliers_table::Migration),
            Box::new(m20240101_000002_create_items_table::Migration),
            Box::new(m20240101_000003_create_alerts_table::Migration),
        ]
    }
}

mod m20240101_000001_create_suppliers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_suppliers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Suppliers::Name).string_len(100).not_null())
                        .col(
                            ColumnDef::new(Suppliers::Type)
                                .string_len(32)
                                .not_null()
                                .default("General"),
                        )
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Address).text().null())
                        .col(ColumnDef::new(Suppliers::City).string().null())
                        .col(ColumnDef::new(Suppliers::Country).string().null())
                        .col(
                            ColumnDef::new(Suppliers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Suppliers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(crate) enum Suppliers {
        Table,
        Id,
        Name,
        Type,
        Email,
        Phone,
        Address,
        City,
        Country,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_items_table {
    use super::m20240101_000001_create_suppliers_table::Suppliers;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Items::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Items::Name).string_len(100).not_null())
                        .col(
                            ColumnDef::new(Items::Sku)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Items::Description).text().null())
                        .col(
                            ColumnDef::new(Items::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Items::Price)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Items::Priority)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Items::ReorderLevel)
                                .integer()
                                .not_null()
                                .default(5),
                        )
                        .col(ColumnDef::new(Items::SupplierId).integer().null())
                        .col(
                            ColumnDef::new(Items::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Items::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_supplier_id")
                                .from(Items::Table, Items::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_supplier_id")
                        .table(Items::Table)
                        .col(Items::SupplierId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(crate) enum Items {
        Table,
        Id,
        Name,
        Sku,
        Description,
        Quantity,
        Price,
        Priority,
        ReorderLevel,
        SupplierId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_alerts_table {
    use super::m20240101_000002_create_items_table::Items;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_alerts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Alerts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Alerts::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Alerts::ItemName).string().not_null())
                        .col(ColumnDef::new(Alerts::ItemId).integer().null())
                        .col(ColumnDef::new(Alerts::Message).text().not_null())
                        .col(
                            ColumnDef::new(Alerts::Type)
                                .string_len(32)
                                .not_null()
                                .default("Low Stock"),
                        )
                        .col(
                            ColumnDef::new(Alerts::Status)
                                .string_len(32)
                                .not_null()
                                .default("Active"),
                        )
                        .col(
                            ColumnDef::new(Alerts::Severity)
                                .string_len(32)
                                .not_null()
                                .default("Medium"),
                        )
                        .col(
                            ColumnDef::new(Alerts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Alerts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_alerts_item_id")
                                .from(Alerts::Table, Alerts::ItemId)
                                .to(Items::Table, Items::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_alerts_status")
                        .table(Alerts::Table)
                        .col(Alerts::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_alerts_created_at")
                        .table(Alerts::Table)
                        .col(Alerts::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Alerts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Alerts {
        Table,
        Id,
        ItemName,
        ItemId,
        Message,
        Type,
        Status,
        Severity,
        CreatedAt,
        UpdatedAt,
    }
}

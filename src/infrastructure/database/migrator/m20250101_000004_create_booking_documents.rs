//! Create booking_documents table

use sea_orm_migration::prelude::*;

use super::m20250101_000003_create_bookings::Bookings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookingDocuments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookingDocuments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BookingDocuments::FileName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookingDocuments::FilePath)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(BookingDocuments::FileType).string_len(100).null())
                    .col(
                        ColumnDef::new(BookingDocuments::FileSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BookingDocuments::BookingId).big_integer().null())
                    .col(
                        ColumnDef::new(BookingDocuments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_documents_booking_id")
                            .from(BookingDocuments::Table, BookingDocuments::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_documents_booking_id")
                    .table(BookingDocuments::Table)
                    .col(BookingDocuments::BookingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingDocuments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BookingDocuments {
    Table,
    Id,
    FileName,
    FilePath,
    FileType,
    FileSize,
    BookingId,
    CreatedAt,
}

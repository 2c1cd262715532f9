use sea_orm_migration::prelude::*;

/// Dashboard users (admin / cs_support)
#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    FullName,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LeadSources {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AdCodes {
    Table,
    Id,
    Code,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RejectionReasons {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Prospects {
    Table,
    Id,
    EntryDate,
    ProspectName,
    WhatsappNumber,
    FacilityName,
    FacilityType,
    Province,
    City,
    LeadSourceId,
    AdCodeId,
    AdId,
    ServiceId,
    Status,
    RejectionReasonId,
    RejectionNote,
    AssignedTo,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Reference tables share the same shape: uuid id, one display column, creation time.
fn reference_table<T: IntoIden + 'static>(
    table: T,
    id: T,
    display: T,
    created_at: T,
) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(id).uuid().not_null().primary_key())
        .col(ColumnDef::new(display).string_len(255).not_null())
        .col(
            ColumnDef::new(created_at)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Profiles::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Profiles::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Profiles::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Profiles::Role).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_profiles_email_unique")
                    .table(Profiles::Table)
                    .col(Profiles::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(reference_table(
                LeadSources::Table,
                LeadSources::Id,
                LeadSources::Name,
                LeadSources::CreatedAt,
            ))
            .await?;
        manager
            .create_table(reference_table(
                AdCodes::Table,
                AdCodes::Id,
                AdCodes::Code,
                AdCodes::CreatedAt,
            ))
            .await?;
        manager
            .create_table(reference_table(
                Services::Table,
                Services::Id,
                Services::Name,
                Services::CreatedAt,
            ))
            .await?;
        manager
            .create_table(reference_table(
                RejectionReasons::Table,
                RejectionReasons::Id,
                RejectionReasons::Name,
                RejectionReasons::CreatedAt,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Prospects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Prospects::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Prospects::EntryDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Prospects::ProspectName).string_len(255).not_null())
                    .col(ColumnDef::new(Prospects::WhatsappNumber).string_len(32).not_null())
                    .col(ColumnDef::new(Prospects::FacilityName).string_len(255).not_null())
                    .col(ColumnDef::new(Prospects::FacilityType).string_len(32).not_null())
                    .col(ColumnDef::new(Prospects::Province).string_len(255).not_null())
                    .col(ColumnDef::new(Prospects::City).string_len(255).not_null())
                    .col(ColumnDef::new(Prospects::LeadSourceId).uuid().not_null())
                    .col(ColumnDef::new(Prospects::AdCodeId).uuid().null())
                    .col(ColumnDef::new(Prospects::AdId).string_len(255).null())
                    .col(ColumnDef::new(Prospects::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(Prospects::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Prospects::RejectionReasonId).uuid().null())
                    .col(ColumnDef::new(Prospects::RejectionNote).text().null())
                    .col(ColumnDef::new(Prospects::AssignedTo).uuid().null())
                    .col(ColumnDef::new(Prospects::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(Prospects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Prospects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prospects_entry_date")
                    .table(Prospects::Table)
                    .col(Prospects::EntryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prospects_assigned_to")
                    .table(Prospects::Table)
                    .col(Prospects::AssignedTo)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Prospects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RejectionReasons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdCodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeadSources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        Ok(())
    }
}

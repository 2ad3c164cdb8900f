//! Clinics, providers and the care team of each patient.
//!
//! - `clinics`, `providers`: catalogs
//! - `clinic_providers`: providers practicing at each clinic
//! - `user_clinics`: the clinic of a patient (one per patient)
//! - `user_providers`: the provider of a patient (one per patient)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Clinics {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Providers {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum ClinicProviders {
    Table,
    ClinicId,
    ProviderId,
}

#[derive(Iden)]
enum UserClinics {
    Table,
    UserId,
    ClinicId,
}

#[derive(Iden)]
enum UserProviders {
    Table,
    UserId,
    ProviderId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clinics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clinics::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Clinics::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Providers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Providers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Providers::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClinicProviders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ClinicProviders::ClinicId).string().not_null())
                    .col(
                        ColumnDef::new(ClinicProviders::ProviderId)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ClinicProviders::ClinicId)
                            .col(ClinicProviders::ProviderId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-clinic_providers-clinic_id")
                            .from(ClinicProviders::Table, ClinicProviders::ClinicId)
                            .to(Clinics::Table, Clinics::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-clinic_providers-provider_id")
                            .from(ClinicProviders::Table, ClinicProviders::ProviderId)
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserClinics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserClinics::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserClinics::ClinicId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_clinics-clinic_id")
                            .from(UserClinics::Table, UserClinics::ClinicId)
                            .to(Clinics::Table, Clinics::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserProviders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProviders::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserProviders::ProviderId)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_providers-provider_id")
                            .from(UserProviders::Table, UserProviders::ProviderId)
                            .to(Providers::Table, Providers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProviders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserClinics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClinicProviders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Providers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clinics::Table).to_owned())
            .await?;
        Ok(())
    }
}

//! Initial schema migration - creates all tables from scratch.
//!
//! - `programs`: cost-assistance program catalog
//! - `patient_programs`: programs assigned to each patient
//! - `drugs`: drug catalog with prices in cents
//! - `patient_drugs`: the medication of a patient (one per patient)
//! - `enrollments`: patient status per program (one per patient and program)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Programs {
    Table,
    Id,
    Name,
    Sponsor,
    MonetaryCap,
    Description,
    ProgramStatus,
    ReEnrollmentDate,
}

#[derive(Iden)]
enum PatientPrograms {
    Table,
    UserId,
    ProgramId,
}

#[derive(Iden)]
enum Drugs {
    Table,
    Id,
    Name,
    WeeklyPrice,
    MonthlyPrice,
    YearlyPrice,
}

#[derive(Iden)]
enum PatientDrugs {
    Table,
    Id,
    UserId,
    DrugId,
    RefillDate,
    WeeklyPrice,
    MonthlyPrice,
    YearlyPrice,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    Id,
    UserId,
    ProgramId,
    Status,
    CompletionDate,
    EnrolledAt,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Programs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Programs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Programs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Programs::Name).string().not_null())
                    .col(ColumnDef::new(Programs::Sponsor).string().not_null())
                    .col(
                        ColumnDef::new(Programs::MonetaryCap)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Programs::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Programs::ProgramStatus)
                            .string()
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(Programs::ReEnrollmentDate).date())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-programs-name")
                    .table(Programs::Table)
                    .col(Programs::Name)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Patient programs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PatientPrograms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PatientPrograms::UserId).string().not_null())
                    .col(
                        ColumnDef::new(PatientPrograms::ProgramId)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PatientPrograms::UserId)
                            .col(PatientPrograms::ProgramId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-patient_programs-program_id")
                            .from(PatientPrograms::Table, PatientPrograms::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Drugs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Drugs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Drugs::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Drugs::Name).string().not_null())
                    .col(ColumnDef::new(Drugs::WeeklyPrice).big_integer().not_null())
                    .col(ColumnDef::new(Drugs::MonthlyPrice).big_integer().not_null())
                    .col(ColumnDef::new(Drugs::YearlyPrice).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Patient drugs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PatientDrugs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PatientDrugs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PatientDrugs::UserId).string().not_null())
                    .col(ColumnDef::new(PatientDrugs::DrugId).string().not_null())
                    .col(ColumnDef::new(PatientDrugs::RefillDate).date())
                    .col(
                        ColumnDef::new(PatientDrugs::WeeklyPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PatientDrugs::MonthlyPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PatientDrugs::YearlyPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-patient_drugs-drug_id")
                            .from(PatientDrugs::Table, PatientDrugs::DrugId)
                            .to(Drugs::Table, Drugs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-patient_drugs-user_id-unique")
                    .table(PatientDrugs::Table)
                    .col(PatientDrugs::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Enrollments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::UserId).string().not_null())
                    .col(ColumnDef::new(Enrollments::ProgramId).string().not_null())
                    // NULL means rejected.
                    .col(ColumnDef::new(Enrollments::Status).string())
                    .col(ColumnDef::new(Enrollments::CompletionDate).date())
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-program_id")
                            .from(Enrollments::Table, Enrollments::ProgramId)
                            .to(Programs::Table, Programs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-enrollments-user_id-program_id-unique")
                    .table(Enrollments::Table)
                    .col(Enrollments::UserId)
                    .col(Enrollments::ProgramId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PatientDrugs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drugs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PatientPrograms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Programs::Table).to_owned())
            .await?;
        Ok(())
    }
}

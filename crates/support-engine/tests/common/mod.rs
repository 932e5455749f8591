//! Shared fixtures for support-engine integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared_types::{
    CaseInput, DocumentRecord, DocumentType, IncomeItem, IncomeSource, Party, PartyRole,
};
use support_engine::StatutorySchedule;

/// Get workspace root path
pub fn workspace_root() -> std::path::PathBuf {
    std::env::var("CARGO_MANIFEST_DIR")
        .map(|d| {
            std::path::PathBuf::from(d)
                .parent()
                .unwrap()
                .parent()
                .unwrap()
                .to_path_buf()
        })
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
}

/// The bundled New York schedule
pub fn ny_schedule() -> StatutorySchedule {
    StatutorySchedule::from_file(workspace_root().join("schedules/ny-2024.toml"))
        .expect("bundled schedule loads")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn wage_earner(role: PartyRole, annual: Decimal) -> Party {
    Party::new(role, vec![IncomeItem::new(IncomeSource::Wages, annual)])
}

pub fn case(payor: Party, payee: Party, children: u32) -> CaseInput {
    CaseInput {
        payor,
        payee,
        number_of_children: children,
        existing_orders: Vec::new(),
        add_on_expenses: Default::default(),
        include_maintenance: false,
        documents: Vec::new(),
    }
}

pub fn net_worth(id: &str, party: PartyRole, monthly_income: Decimal) -> DocumentRecord {
    DocumentRecord::new(id, party, DocumentType::NetWorthStatement, date(2024, 3, 15))
        .with_item("monthly_income", monthly_income)
}

pub fn tax_return(id: &str, party: PartyRole, total_income: Decimal) -> DocumentRecord {
    DocumentRecord::new(id, party, DocumentType::TaxReturn, date(2024, 4, 15))
        .with_item("total_income", total_income)
}

pub fn bank_statement(id: &str, party: PartyRole, month: u32) -> DocumentRecord {
    DocumentRecord::new(id, party, DocumentType::BankStatement, date(2024, month, 28))
}

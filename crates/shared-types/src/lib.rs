pub mod fingerprint;
pub mod report;
pub mod types;

pub use fingerprint::{fingerprint, FingerprintError};
pub use report::{
    AboveCapInformation, AddOnShare, AnalysisReport, ChildSupportComputation, ConsistencyFinding,
    DisallowedDeduction, Materiality, MaintenanceComputation, MaintenanceTrack, NormalizedIncome,
    PaymentSchedule, ProRataShares, ReportContents, ReportSummary, RiskAssessment, RiskSignal,
    SupportComputation,
};
pub use types::{
    AddOnExpenses, AddOnKind, CaseInput, DeductionCategory, DeductionItem, DocumentRecord,
    DocumentType, ExistingOrder, IncomeItem, IncomeSource, OrderKind, Party, PartyRole,
};

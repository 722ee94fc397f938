pub mod diagnosis;
pub mod guards;
pub mod ledger;
pub mod settlement;

pub use diagnosis::DiagnosisService;
pub use ledger::LedgerService;
pub use settlement::SettlementService;

pub mod catalog;
pub mod ledger;
pub mod materials;
pub mod record;

pub use catalog::CatalogLoader;
pub use ledger::{ExportSummary, ItemRef, LedgerEntry, LedgerExporter, MaterialRef};
pub use materials::MaterialsLoader;
pub use record::LoadOutcome;

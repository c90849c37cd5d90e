pub mod csv;
pub mod record;
pub mod store;

pub use record::{PetRecord, PET_CSV_FIELDS};
pub use store::{PetStore, UpsertOutcome};

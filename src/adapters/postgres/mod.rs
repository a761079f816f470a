//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPromoCodeLedger` - Transactional promo code redemption
//! - `PostgresGrantReader` - Premium grants and history queries
//! - `PostgresAccountRepository` - Account facts with cascading delete

mod account_repository;
mod grant_reader;
mod promo_code_ledger;

pub use account_repository::PostgresAccountRepository;
pub use grant_reader::PostgresGrantReader;
pub use promo_code_ledger::PostgresPromoCodeLedger;

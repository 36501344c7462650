mod trait_store;
mod types;

pub use trait_store::ProviderStore;
pub use types::{ModelLocation, StoreError};

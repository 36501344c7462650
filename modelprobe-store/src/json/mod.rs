mod atomic;
mod store;

pub(crate) use atomic::write_atomic;
pub use store::JsonFileStore;

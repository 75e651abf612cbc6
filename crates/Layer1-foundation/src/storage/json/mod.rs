mod finite;
mod store;

pub use store::JsonStore;

pub mod collection_hook;

pub use collection_hook::CollectionHook;

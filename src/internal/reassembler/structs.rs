pub mod collection_hooks_container;
pub mod collection_reassembler;
pub mod collection_state;
pub(crate) mod hook_adapters;
pub mod reassembler_error;

pub use collection_hooks_container::CollectionHooksContainer;
pub use collection_reassembler::CollectionReassembler;
pub use collection_state::CollectionState;
pub use reassembler_error::ReassemblerError;

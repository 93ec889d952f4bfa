pub mod completion_markers;
pub mod coordinator_error;
pub(crate) mod hook_adapters;
pub mod object_coordinator;
pub mod object_hooks_container;

pub use completion_markers::{CompletionMarkers, Marker};
pub use coordinator_error::CoordinatorError;
pub use object_coordinator::ObjectCoordinator;
pub use object_hooks_container::ObjectHooksContainer;

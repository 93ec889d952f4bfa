pub mod event_queue;
pub mod hook_dispatcher;
pub mod observable;

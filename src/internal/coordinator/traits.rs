pub mod object_hook;

pub use object_hook::ObjectHook;

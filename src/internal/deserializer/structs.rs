pub mod deserializer_config;
pub mod deserializer_event;
pub mod deserializer_state;
pub mod deserializer_worker;
pub mod kill_switch;
pub mod parse_error;
pub mod streaming_deserializer;

// 重导出公共类型
pub use deserializer_config::{BatchPolicy, DeserializerConfig, DEFAULT_BATCH_BYTES};
pub use deserializer_event::DeserializerEvent;
pub use deserializer_state::DeserializerState;
pub use deserializer_worker::{spawn_deserializer_worker, DeserializerWorker};
pub use kill_switch::KillSwitch;
pub use parse_error::ParseError;
pub use streaming_deserializer::StreamingDeserializer;

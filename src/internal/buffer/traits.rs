pub mod byte_cursor;

pub use byte_cursor::ByteCursor;

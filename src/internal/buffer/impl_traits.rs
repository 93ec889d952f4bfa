pub mod impl_byte_cursor;

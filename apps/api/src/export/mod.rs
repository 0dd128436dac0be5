pub mod assembler;
pub mod formatter;
pub mod handlers;

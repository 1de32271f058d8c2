pub mod error;
pub mod exception;
pub mod formatter;
pub mod identity;
pub mod indent;
pub mod record;
pub mod template;

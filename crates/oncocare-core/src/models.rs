pub mod prompt;
pub mod record;
pub mod specification;

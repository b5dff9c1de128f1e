pub mod generator_service;
pub mod parser_service;
pub mod selector_service;

pub use generator_service::GeneratorService;
pub use parser_service::ParserService;
pub use selector_service::{SelectionError, SelectorService, ShortageError};

//! Application layer: use cases and shared error types

pub mod errors;
pub mod use_cases;

pub use errors::ApplicationError;
pub use use_cases::{
    BrowseFeedsUseCase, GetCveDetailsUseCase, GetCweDetailsUseCase, GetCweTop25UseCase,
    QueryCveCatalogUseCase,
};

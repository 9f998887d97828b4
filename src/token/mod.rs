// Internal modules
mod builder;
mod header;
mod parsed;

// Public API exports
pub use header::TokenHeader;
pub use parsed::ParsedToken;

// Internal types (used by the service but not exposed in public API)
pub(crate) use builder::TokenBuilder;

pub mod matrix_identifiers;
pub mod request_helpers;

//! Small helpers shared by the pipeline stages.
//!
//! - **URL handling**: host extraction for the domain filter and SSRF checks
//!   for resolver probes
//! - **Text processing**: removal of characters that cannot appear in XML 1.0

mod text;
mod url_validator;

pub use text::strip_control_chars;
pub use url_validator::{host_of, is_public_ip, normalize_host, validate_url, UrlValidationError};

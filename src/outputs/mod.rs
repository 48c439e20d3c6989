//! Output generation for scan reports.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`ScanReport`](crate::models::ScanReport) to disk for later inspection
//! - [`email`]: Renders the HTML/plaintext digest and submits it over SMTP
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 071500.json
//!     └── 191500.json
//! ```

pub mod email;
pub mod json;

//! Bundled example forms.
//!
//! # Examples
//!
//! ```
//! use formwright::showcase::organization;
//!
//! let kit = organization::form().unwrap();
//! assert_eq!(kit.binding_names().form_root, "OrganizationForm");
//! ```

pub use formwright_showcase::*;

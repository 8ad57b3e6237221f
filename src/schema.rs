//! Shapes, field paths and validation.
//!
//! # Examples
//!
//! ```
//! use formwright::schema::{FieldPath, Schema, shape};
//!
//! let schema = Schema::new(shape::object().field("tags", shape::array(shape::string()))).unwrap();
//! assert!(schema.is_list(&FieldPath::parse("tags").unwrap()));
//! ```

pub use formwright_schema::*;

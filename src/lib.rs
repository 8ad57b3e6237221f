//! # Formwright
//!
//! Schema-driven form state for browser applications.
//!
//! A form is declared once as a runtime schema. From it, formwright derives
//! every addressable field path, validates whole submissions and single
//! fields, and keeps per-instance state (values, errors, status and stable
//! list keys) behind cheap cloneable handles.
//!
//! ## Crates
//!
//! - [`schema`]: shapes, paths, validation and the flat payload codec
//! - [`forms`]: form instances, field handles, intents and the factory
//! - [`showcase`]: ready-made contact, user, product, organization and dynamic forms
//!   (feature `showcase`, on by default)
//!
//! ## Quick Example
//!
//! ```
//! use formwright::prelude::*;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! struct Signup {
//!     email: String,
//!     seats: u32,
//! }
//!
//! let schema = Schema::new(
//!     shape::object()
//!         .field("email", shape::string().email("Enter a valid email"))
//!         .field("seats", shape::number().int("Whole seats only").with_default(1)),
//! )
//! .unwrap();
//! let kit = create_form::<Signup>(schema, "Signup").unwrap();
//! let form = kit.use_form(FormOptions::new().validate_on(ValidationTrigger::OnBlur));
//!
//! let email = kit.use_field(&form, &kit.path("email").unwrap());
//! email.on_change("not-an-email");
//! email.on_blur();
//! assert_eq!(email.error().as_deref(), Some("Enter a valid email"));
//!
//! email.on_change("ada@example.com");
//! assert_eq!(form.submit(), SubmitOutcome::Success);
//! assert_eq!(form.value(), json!({"email": "ada@example.com", "seats": 1}));
//! ```

pub mod forms;
pub mod schema;
#[cfg(feature = "showcase")]
pub mod showcase;

/// Everything needed to declare a schema and drive a form
pub mod prelude {
	pub use formwright_forms::{
		FieldEvent, FieldHandle, FormError, FormInstance, FormKit, FormMetadata, FormOptions,
		FormResult, FormRoot, FormStatus, Intent, ItemKey, SchemaPath, SubmitOutcome,
		ValidationTrigger, create_form,
	};
	pub use formwright_schema::shape::{self, Refinement, ShapeExt};
	pub use formwright_schema::{
		FieldPath, FormData, Schema, SchemaError, SchemaResult, Submission,
	};
	pub use serde::{Deserialize, Serialize};
}

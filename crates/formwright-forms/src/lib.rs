//! Form state and the typed form factory for formwright
//!
//! Built on the schema crate, this crate provides:
//! - [`FormInstance`]: the per-form state store (values, errors, list keys,
//!   submission status)
//! - [`FieldHandle`] and [`ListItemHandle`]: per-path views with change and
//!   blur bindings
//! - [`create_form`] and [`FormKit`]: one schema bound to one form name
//! - [`FormRoot`] and [`Intent`]: native submissions, including list
//!   changes requested by submit buttons
//!
//! ## Example
//!
//! ```
//! use formwright_forms::{FormOptions, SubmitOutcome, ValidationTrigger, create_form};
//! use formwright_schema::{Schema, shape};
//! use serde_json::Value;
//!
//! let schema = Schema::new(
//!     shape::object()
//!         .field("name", shape::string().min(1, "Enter your name"))
//!         .field("email", shape::string().email("Enter a valid email")),
//! )
//! .unwrap();
//! let kit = create_form::<Value>(schema, "Signup").unwrap();
//! let form = kit.use_form(FormOptions::new().validate_on(ValidationTrigger::OnBlur));
//!
//! let email = kit.use_field(&form, &kit.path("email").unwrap());
//! email.on_change("nope");
//! email.on_blur();
//! assert_eq!(email.error().as_deref(), Some("Enter a valid email"));
//!
//! assert_eq!(form.submit(), SubmitOutcome::Error);
//! let summary = kit.use_form_metadata(&form);
//! assert_eq!(summary.errors.len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod factory;
pub mod field;
pub mod intent;
pub mod metadata;
pub mod root;
pub mod status;
pub mod store;

pub use config::{FieldEvent, FormOptions, ValidationTrigger};
pub use error::{FormError, FormResult};
pub use factory::{BindingNames, FormKit, SchemaPath, create_form};
pub use field::{FieldHandle, ListItemHandle};
pub use intent::{INTENT_FIELD, Intent, IntentButton};
pub use metadata::FormMetadata;
pub use root::{FormRoot, FormRootProps};
pub use status::{FormStatus, SubmitOutcome};
pub use store::{FormInstance, FormSnapshot, ItemKey};

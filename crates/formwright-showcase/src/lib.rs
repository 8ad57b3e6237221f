//! Ready-made forms built on formwright
//!
//! Each module declares one schema, the typed model a successful
//! submission decodes into, and a `form()` constructor returning the
//! bound [`FormKit`](formwright_forms::FormKit):
//! - [`contact`]: inquiry form, with simple and draft variants
//! - [`user`]: account registration with password confirmation
//! - [`product`]: product listing with a price cross-check
//! - [`organization`]: nested departments and employees
//! - [`dynamic`]: form definitions, and the forms they describe
//!
//! # Examples
//!
//! ```
//! use formwright_forms::{FormOptions, SubmitOutcome};
//! use formwright_schema::FormData;
//! use formwright_showcase::contact;
//!
//! let kit = contact::simple_form().unwrap();
//! let form = kit.use_form(FormOptions::default());
//! let outcome = kit.form_root(&form).handle_submit(FormData::from_entries([
//!     ("firstName", "太郎"),
//!     ("lastName", "田中"),
//!     ("email", "Taro@Example.com"),
//!     ("subject", "お問い合わせ"),
//!     ("message", "テストメッセージです。"),
//!     ("privacyPolicyAccepted", "on"),
//! ]));
//! assert_eq!(outcome, SubmitOutcome::Success);
//! ```

pub mod contact;
pub mod dynamic;
pub mod organization;
pub mod product;
pub mod user;

use regex::Regex;
use std::sync::LazyLock;

/// Domestic landline or mobile number with hyphens
pub(crate) static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^0\d{1,4}-\d{1,4}-\d{4}$|^0[789]0-\d{4}-\d{4}$").expect("valid phone number regex")
});

pub(crate) const PHONE_NUMBER_MESSAGE: &str =
	"電話番号は正しい形式で入力してください（例：03-1234-5678、090-1234-5678）";

//! Form root: native submission entry point

use crate::error::{FormError, FormResult};
use crate::intent::{INTENT_FIELD, Intent};
use crate::status::{FormStatus, SubmitOutcome};
use crate::store::FormInstance;
use formwright_schema::FormData;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Attributes for the `<form>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRootProps {
	pub id: String,
	/// Browser validation is off; the schema decides
	pub no_validate: bool,
}

/// Binds native submissions of one `<form>` to its instance
pub struct FormRoot<T> {
	form: FormInstance<T>,
}

impl<T> Clone for FormRoot<T> {
	fn clone(&self) -> Self {
		Self {
			form: self.form.clone(),
		}
	}
}

impl<T> std::fmt::Debug for FormRoot<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormRoot").field("form", &self.form).finish()
	}
}

impl<T> FormRoot<T> {
	pub(crate) fn new(form: FormInstance<T>) -> Self {
		Self { form }
	}

	pub fn form(&self) -> &FormInstance<T> {
		&self.form
	}

	pub fn props(&self) -> FormRootProps {
		FormRootProps {
			id: self.form.id(),
			no_validate: true,
		}
	}
}

impl<T: DeserializeOwned> FormRoot<T> {
	/// Handle a native submission.
	///
	/// The payload replaces the instance's value tree. If it carries an
	/// intent, the intent is applied and nothing is submitted; otherwise
	/// the form is validated and submitted. A malformed intent, or a
	/// submission arriving while validation runs, leaves the form untouched.
	///
	/// # Examples
	///
	/// ```
	/// use formwright_forms::{FormOptions, SubmitOutcome, create_form};
	/// use formwright_schema::{FormData, Schema, shape};
	/// use serde_json::{Value, json};
	///
	/// let schema = Schema::new(shape::object().field("tags", shape::array(shape::string()))).unwrap();
	/// let kit = create_form::<Value>(schema, "Tags").unwrap();
	/// let form = kit.use_form(FormOptions::default());
	/// let root = kit.form_root(&form);
	///
	/// let add = kit.use_form_metadata(&form).insert("tags", None, None);
	/// let payload = FormData::from_entries([("tags[0]", "red"), (add.name, add.value.as_str())]);
	/// assert_eq!(root.handle_submit(payload), SubmitOutcome::Intent);
	/// assert_eq!(form.value(), json!({"tags": ["red", null]}));
	/// ```
	pub fn handle_submit(&self, mut data: FormData) -> SubmitOutcome {
		if self.form.status() == FormStatus::Validating {
			tracing::debug!(form = %self.form.id(), "Submission ignored while validating");
			return SubmitOutcome::Ignored;
		}
		let parsed = data
			.remove(INTENT_FIELD)
			.into_iter()
			.next()
			.map(|raw| Intent::parse(&raw).and_then(|intent| intent.path().map(|_| intent)));
		let intent = match parsed {
			None => None,
			Some(Ok(intent)) => Some(intent),
			Some(Err(err)) => return self.ignore(&err),
		};
		self.form.load(data.parse());

		let Some(intent) = intent else {
			return self.form.submit();
		};
		match self.form.dispatch(&intent) {
			Ok(()) => SubmitOutcome::Intent,
			Err(err) => self.ignore(&err),
		}
	}

	fn ignore(&self, err: &FormError) -> SubmitOutcome {
		tracing::warn!(form = %self.form.id(), error = %err, "Ignoring submission with a malformed intent");
		SubmitOutcome::Ignored
	}

	/// Handle an `application/x-www-form-urlencoded` body
	pub fn handle_urlencoded(&self, body: &str) -> FormResult<SubmitOutcome> {
		Ok(self.handle_submit(FormData::from_urlencoded(body)?))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::FormOptions;
	use crate::factory::{FormKit, create_form};
	use formwright_schema::{FieldPath, Schema, shape};
	use rstest::{fixture, rstest};
	use serde_json::{Value, json};

	#[fixture]
	fn kit() -> FormKit<Value> {
		let line = shape::object()
			.field("sku", shape::string().min(1, "Enter a SKU"))
			.field("quantity", shape::number().int("Whole units").positive("At least one"));
		let schema = Schema::new(
			shape::object()
				.field("customer", shape::string().min(1, "Enter a customer"))
				.field("lines", shape::array(line).min(1, "Add a line")),
		)
		.unwrap();
		create_form(schema, "Order").unwrap()
	}

	#[rstest]
	fn test_props(kit: FormKit<Value>) {
		let form = kit.use_form(FormOptions::new().with_id("order-1"));
		let props = kit.form_root(&form).props();
		assert_eq!(
			serde_json::to_value(props).unwrap(),
			json!({"id": "order-1", "noValidate": true})
		);
	}

	#[rstest]
	fn test_plain_submission_validates(kit: FormKit<Value>) {
		let form = kit.use_form(FormOptions::default());
		let root = kit.form_root(&form);
		let payload = FormData::from_entries([
			("customer", "Acme"),
			("lines[0].sku", "A-1"),
			("lines[0].quantity", "0"),
		]);
		assert_eq!(root.handle_submit(payload), SubmitOutcome::Error);
		assert_eq!(
			form.errors_at(&FieldPath::parse("lines[0].quantity").unwrap()),
			["At least one".to_string()]
		);

		let body = "customer=Acme&lines%5B0%5D.sku=A-1&lines%5B0%5D.quantity=2";
		assert_eq!(root.handle_urlencoded(body).unwrap(), SubmitOutcome::Success);
		assert_eq!(form.status(), FormStatus::Success);
	}

	#[rstest]
	fn test_remove_intent_skips_validation(kit: FormKit<Value>) {
		let form = kit.use_form(FormOptions::default());
		let root = kit.form_root(&form);
		let remove = kit.use_form_metadata(&form).remove("lines", 0);
		let payload = FormData::from_entries([
			("lines[0].sku", "A-1"),
			("lines[1].sku", "B-2"),
			(remove.name, remove.value.as_str()),
		]);
		assert_eq!(root.handle_submit(payload), SubmitOutcome::Intent);
		assert_eq!(form.value(), json!({"lines": [{"sku": "B-2"}]}));
		assert_eq!(form.status(), FormStatus::Idle);
		assert!(form.errors().is_empty());
	}

	#[rstest]
	fn test_malformed_intent_is_ignored(kit: FormKit<Value>) {
		let form = kit.use_form(FormOptions::default());
		let root = kit.form_root(&form);
		form.insert_list_item(&FieldPath::parse("lines").unwrap(), None, Some(json!({"sku": "keep"})));
		let before = form.value();
		let keys = form.list_keys(&FieldPath::parse("lines").unwrap());

		for raw in ["{oops", r#"{"type": "remove", "payload": {"name": "lines[", "index": 0}}"#] {
			let payload = FormData::from_entries([("customer", "Mallory"), (INTENT_FIELD, raw)]);
			assert_eq!(root.handle_submit(payload), SubmitOutcome::Ignored);
			assert_eq!(form.status(), FormStatus::Idle);
			assert_eq!(form.value(), before);
			assert_eq!(form.list_keys(&FieldPath::parse("lines").unwrap()), keys);
		}
	}

	#[rstest]
	fn test_submission_while_validating_keeps_values(kit: FormKit<Value>) {
		let form = kit.use_form(FormOptions::default());
		let root = kit.form_root(&form);
		form.set_value(&FieldPath::parse("customer").unwrap(), "Acme");
		form.force_status(FormStatus::Validating);

		let payload = FormData::from_entries([("customer", "Mallory")]);
		assert_eq!(root.handle_submit(payload), SubmitOutcome::Ignored);
		assert_eq!(form.value()["customer"], json!("Acme"));
	}
}

//! End-to-end lifecycle of forms built through the factory

use formwright_forms::{FormOptions, FormStatus, SubmitOutcome, ValidationTrigger, create_form};
use formwright_schema::shape::{self, Refinement, ShapeExt};
use formwright_schema::{FormData, Schema};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
enum Payment {
	Card {
		number: String,
		holder: String,
	},
	Transfer {
		iban: String,
		#[serde(default)]
		reference: Option<String>,
	},
}

#[fixture]
fn payment_schema() -> Schema {
	let card = shape::object()
		.field("method", shape::enumeration(["card"]))
		.field(
			"number",
			shape::string()
				.trim()
				.try_pattern(r"^\d{16}$", "Card numbers have 16 digits")
				.unwrap(),
		)
		.field("holder", shape::string().min(1, "Enter the card holder").to_upper_case());
	let transfer = shape::object()
		.field("method", shape::enumeration(["transfer"]))
		.field("iban", shape::string().min(15, "IBAN too short"))
		.field("reference", shape::string().max(35, "Reference too long").optional());
	Schema::new(shape::discriminated_union("method", [card, transfer])).unwrap()
}

#[rstest]
fn test_discriminated_payment_form(payment_schema: Schema) {
	let kit = create_form::<Payment>(payment_schema, "Payment").unwrap();
	let form = kit.use_form(FormOptions::default());
	let received = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&received);
	form.on_submit(move |payment| sink.borrow_mut().push(payment));
	let root = kit.form_root(&form);

	let outcome = root.handle_submit(FormData::from_entries([("method", "cash")]));
	assert_eq!(outcome, SubmitOutcome::Error);
	assert_eq!(form.errors().keys().collect::<Vec<_>>(), ["method"]);

	let outcome = root.handle_submit(FormData::from_entries([
		("method", "card"),
		("number", " 4242424242424242 "),
		("holder", "ada lovelace"),
	]));
	assert_eq!(outcome, SubmitOutcome::Success);
	assert_eq!(
		received.borrow().as_slice(),
		[Payment::Card {
			number: "4242424242424242".into(),
			holder: "ADA LOVELACE".into(),
		}]
	);
	// the store keeps what the user typed; the callback sees the parsed value
	assert_eq!(form.value()["holder"], json!("ada lovelace"));
}

#[rstest]
fn test_options_from_toml_drive_validation(payment_schema: Schema) {
	let options = FormOptions::from_toml_str(
		r#"
		id = "checkout-payment"
		validate_on = "onBlur"
		revalidate_on = "onInput"

		[default_value]
		method = "transfer"
		"#,
	)
	.unwrap();
	let kit = create_form::<Payment>(payment_schema, "Payment").unwrap();
	let form = kit.use_form(options);
	assert_eq!(kit.form_root(&form).props().id, "checkout-payment");

	let iban = kit.use_field(&form, &kit.path("iban").unwrap());
	iban.on_change("DE89");
	assert!(iban.errors().is_empty());
	iban.on_blur();
	assert_eq!(iban.error().as_deref(), Some("IBAN too short"));
	iban.on_change("DE89370400440532013000");
	assert!(iban.errors().is_empty());

	assert_eq!(form.submit(), SubmitOutcome::Success);
	form.reset();
	assert_eq!(form.value(), json!({"method": "transfer"}));
	assert_eq!(form.status(), FormStatus::Idle);
}

#[rstest]
fn test_two_forms_on_one_page_stay_apart() {
	let schema = Schema::new(
		shape::object()
			.field("query", shape::string().min(2, "Type more"))
			.field("page", shape::number().int("Whole pages").with_default(1)),
	)
	.unwrap();
	let search = create_form::<Value>(schema.clone(), "Search").unwrap();
	let filter = create_form::<Value>(schema, "Filter").unwrap();
	assert_ne!(search.binding_names(), filter.binding_names());

	let options = FormOptions::new().validate_on(ValidationTrigger::OnInput);
	let top = search.use_form(options.clone());
	let side = filter.use_form(options);
	let query = search.path("query").unwrap();
	search.use_field(&top, &query).on_change("a");

	let side_query = filter.use_field_dynamic(&side, "query");
	assert_eq!(side_query.value(), None);
	assert!(side_query.errors().is_empty());
	assert_eq!(side_query.id(), "Filter-query");
	assert_eq!(search.use_field(&top, &query).error().as_deref(), Some("Type more"));
	assert_eq!(side.value(), json!({"page": 1}));
}

#[rstest]
fn test_form_level_refinement_surfaces_in_metadata() {
	let schema = Schema::new(
		shape::object()
			.field("adults", shape::number().int("Whole people"))
			.field("children", shape::number().int("Whole people"))
			.refine(Refinement::new("Book at least one seat", |v| {
				let count = |key: &str| v.get(key).and_then(Value::as_f64).unwrap_or(0.0);
				count("adults") + count("children") > 0.0
			})),
	)
	.unwrap();
	let kit = create_form::<Value>(schema, "Booking").unwrap();
	let form = kit.use_form(FormOptions::default());
	kit.use_field_dynamic(&form, "adults").on_change(0);
	kit.use_field_dynamic(&form, "children").on_change(0);
	assert_eq!(form.submit(), SubmitOutcome::Error);

	let meta = kit.use_form_metadata(&form);
	assert_eq!(meta.form_errors, ["Book at least one seat".to_string()]);
	assert!(meta.errors.is_empty());
	assert_eq!(form.form_errors(), meta.form_errors);
}

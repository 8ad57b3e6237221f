//! User-facing scenarios across the bundled forms

use formwright_forms::{FormOptions, FormStatus, SubmitOutcome, ValidationTrigger};
use formwright_schema::{FieldPath, FormData};
use formwright_showcase::contact::{self, ContactForm, ContactMethod, Priority};
use formwright_showcase::dynamic::{self, DynamicFormConfig, DynamicFormData, FormSettings};
use formwright_showcase::organization::{self, Organization};
use formwright_showcase::{product, user};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;

fn path(input: &str) -> FieldPath {
	FieldPath::parse(input).unwrap()
}

#[fixture]
fn contact_payload() -> Value {
	json!({
		"firstName": "太郎",
		"lastName": "田中",
		"email": "taro@example.com",
		"contactType": "general",
		"subject": "お問い合わせ",
		"message": "テストメッセージです。",
		"privacyPolicyAccepted": true,
	})
}

fn employee(name: &str) -> Value {
	json!({
		"name": name,
		"role": "Engineer",
		"email": "staff@example.com",
		"contact": {"workPhone": "03-1234-5678"},
		"projects": [],
	})
}

#[fixture]
fn organization_payload() -> Value {
	json!({
		"organizationName": "Acme",
		"establishedDate": "2001-04-01",
		"address": {
			"country": "日本",
			"zipCode": "100-0001",
			"state": "東京都",
			"city": "千代田区",
			"street": "1-1",
		},
		"departments": [
			{"name": "営業部", "employees": [employee("佐藤")]},
			{"name": "開発部", "employees": [employee("山田"), employee("鈴木")]},
		],
	})
}

#[rstest]
fn test_contact_minimal_success(contact_payload: Value) {
	let kit = contact::form().unwrap();
	let form = kit.use_form(FormOptions::default());
	let received = Rc::new(RefCell::new(None));
	let sink = Rc::clone(&received);
	form.on_submit(move |contact: ContactForm| *sink.borrow_mut() = Some(contact));

	form.load(contact_payload);
	assert_eq!(form.submit(), SubmitOutcome::Success);
	assert_eq!(form.status(), FormStatus::Success);

	let contact = received.borrow_mut().take().unwrap();
	assert_eq!(contact.priority, Priority::Normal);
	assert_eq!(contact.preferred_contact_method, ContactMethod::Email);
	assert_eq!(contact.first_name, "太郎");
}

#[rstest]
fn test_contact_phone_is_required_for_phone_contact(contact_payload: Value) {
	let kit = contact::form().unwrap();
	let form = kit.use_form(FormOptions::new().revalidate_on(ValidationTrigger::OnInput));
	let mut payload = contact_payload;
	payload["preferredContactMethod"] = json!("phone");
	form.load(payload);

	assert_eq!(form.submit(), SubmitOutcome::Error);
	assert_eq!(form.status(), FormStatus::Error);
	let phone = kit.use_field(&form, &kit.path("phoneNumber").unwrap());
	assert_eq!(
		phone.error().as_deref(),
		Some("電話での連絡をご希望の場合は電話番号を入力してください")
	);
	assert_eq!(form.errors().keys().collect::<Vec<_>>(), ["phoneNumber"]);

	// after a submit, changes revalidate the rule from the other side
	phone.on_change("090-1234-5678");
	assert!(phone.errors().is_empty());
	let method = kit.use_field(&form, &kit.path("preferredContactMethod").unwrap());
	assert!(ContactMethod::Phone.needs_phone());
	method.on_change("both");
	assert!(phone.is_valid());
}

#[rstest]
fn test_contact_native_submission() {
	let kit = contact::form().unwrap();
	let form = kit.use_form(FormOptions::default());
	let body = "firstName=%E5%A4%AA%E9%83%8E&lastName=%E7%94%B0%E4%B8%AD&email=taro%40example.com\
		&contactType=support&subject=Hello&message=Please+call+me+back&privacyPolicyAccepted=on\
		&preferredContactMethod=both&phoneNumber=03-1234-5678";
	let outcome = kit.form_root(&form).handle_urlencoded(body).unwrap();
	assert_eq!(outcome, SubmitOutcome::Success);
}

#[rstest]
fn test_product_price_must_undercut_list_price() {
	let kit = product::form().unwrap();
	let form = kit.use_form(FormOptions::default());
	let root = kit.form_root(&form);
	let outcome = root.handle_submit(FormData::from_entries([
		("name", "ワイヤレスイヤホン"),
		("description", "ノイズキャンセリング対応のイヤホンです"),
		("price", "160000"),
		("originalPrice", "150000"),
		("category", "electronics"),
		("condition", "new"),
		("images[0]", "https://example.com/a.png"),
	]));
	assert_eq!(outcome, SubmitOutcome::Error);
	assert_eq!(
		form.errors_at(&path("price")),
		[product::PRICE_ABOVE_LIST.to_string()]
	);
	assert!(form.errors_at(&path("originalPrice")).is_empty());
}

#[rstest]
fn test_removing_a_department_keeps_the_other_intact(organization_payload: Value) {
	let kit = organization::form().unwrap();
	let form = kit.use_form(FormOptions::default());
	form.load(organization_payload.clone());

	let departments = kit.use_field(&form, &kit.path("departments").unwrap());
	let keys = departments.get_list().iter().map(|item| item.key()).collect::<Vec<_>>();
	assert_eq!(departments.remove(0), Some(keys[0]));

	let remaining = departments.get_list();
	assert_eq!(remaining.len(), 1);
	assert_eq!(remaining[0].key(), keys[1]);
	assert_eq!(
		remaining[0].handle().value(),
		Some(organization_payload["departments"][1].clone())
	);
	assert_eq!(remaining[0].field("employees").get_list().len(), 2);

	let received = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&received);
	form.on_submit(move |org: Organization| sink.borrow_mut().push(org));
	assert_eq!(form.submit(), SubmitOutcome::Success);
	let orgs = received.borrow();
	assert_eq!(orgs[0].departments.len(), 1);
	assert_eq!(orgs[0].departments[0].name, "開発部");
	assert_eq!(orgs[0].departments[0].employees[1].name, "鈴木");
}

#[rstest]
fn test_remove_intent_from_the_browser(organization_payload: Value) {
	let kit = organization::form().unwrap();
	let form = kit.use_form(FormOptions::default());
	let mut data = FormData::encode(&organization_payload);
	let button = kit.use_form_metadata(&form).remove("departments", 0);
	data.append(button.name, button.value);

	assert_eq!(kit.form_root(&form).handle_submit(data), SubmitOutcome::Intent);
	assert_eq!(form.status(), FormStatus::Idle);
	let departments = form.value_at(&path("departments")).unwrap();
	assert_eq!(departments.as_array().map(Vec::len), Some(1));
	assert_eq!(departments[0]["name"], json!("開発部"));
}

#[rstest]
fn test_list_keys_survive_removal_and_insertion() {
	let kit = product::form().unwrap();
	let form = kit.use_form(FormOptions::default());
	let images = kit.use_field(&form, &kit.path("images").unwrap());
	for name in ["a", "b", "c"] {
		images.append(Some(json!(format!("https://example.com/{name}.png"))));
	}
	let keys = form.list_keys(&path("images"));
	assert_eq!(
		keys.iter().map(ToString::to_string).collect::<Vec<_>>(),
		["k0", "k1", "k2"]
	);

	images.remove(1);
	assert_eq!(form.list_keys(&path("images")), [keys[0], keys[2]]);

	let fresh = images.insert(1, None).unwrap();
	assert_eq!(fresh.to_string(), "k3");
	assert!(!keys.contains(&fresh));
	assert_eq!(form.list_keys(&path("images")), [keys[0], fresh, keys[2]]);
	let items = images.get_list();
	assert_eq!(items.iter().map(|item| item.index()).collect::<Vec<_>>(), [0, 1, 2]);
	assert_eq!(items[2].handle().value(), Some(json!("https://example.com/c.png")));
}

#[rstest]
fn test_errors_accumulate_on_one_field() {
	let kit = user::form().unwrap();
	let form = kit.use_form(FormOptions::new().validate_on(ValidationTrigger::OnBlur));
	let confirm = kit.use_field(&form, &kit.path("confirmPassword").unwrap());
	let password = kit.use_field(&form, &kit.path("password").unwrap());

	password.on_change("short");
	password.on_blur();
	assert_eq!(password.errors().len(), 2);
	assert_eq!(password.error().as_deref(), Some("パスワードは8文字以上で入力してください"));

	confirm.on_change("different");
	confirm.on_blur();
	assert_eq!(confirm.errors(), [user::PASSWORD_MISMATCH.to_string()]);
}

#[rstest]
fn test_reset_twice_equals_reset_once(contact_payload: Value) {
	let kit = contact::form().unwrap();
	let form = kit.use_form(FormOptions::default());
	let mut payload = contact_payload;
	payload["preferredContactMethod"] = json!("phone");
	form.load(payload);
	form.submit();
	assert!(!form.is_valid());

	form.reset();
	let once = form.snapshot();
	form.reset();
	assert_eq!(form.snapshot(), once);
	assert_eq!(once.status, FormStatus::Idle);
	assert!(once.errors.is_empty());
	assert!(!once.dirty);
	assert_eq!(once.value["priority"], json!("normal"));
	assert_eq!(once.value["preferredContactMethod"], json!("email"));
}

#[fixture]
fn definition() -> Value {
	json!({
		"id": "newsletter-signup",
		"name": "newsletter",
		"title": "Newsletter",
		"fields": [
			{
				"id": "email",
				"name": "email",
				"type": "email",
				"label": "Email",
				"validations": [{"type": "required", "message": "Email is required"}],
				"customAttributes": {"autocomplete": "email"},
			},
			{
				"id": "age",
				"name": "age",
				"type": "number",
				"label": "Age",
				"validations": [{"type": "min", "value": 18, "message": "Adults only"}],
			},
		],
	})
}

fn submitted_definition(definition: Value) -> DynamicFormConfig {
	let kit = dynamic::form().unwrap();
	let form = kit.use_form(FormOptions::default());
	let received = Rc::new(RefCell::new(None));
	let sink = Rc::clone(&received);
	form.on_submit(move |config: DynamicFormConfig| *sink.borrow_mut() = Some(config));
	form.load(definition);
	assert_eq!(form.submit(), SubmitOutcome::Success);
	received.borrow_mut().take().unwrap()
}

#[rstest]
fn test_definition_with_duplicate_ids_is_rejected(definition: Value) {
	let kit = dynamic::form().unwrap();
	let form = kit.use_form(FormOptions::default());
	let mut payload = definition;
	payload["fields"][1]["id"] = json!("email");
	form.load(payload);

	assert_eq!(form.submit(), SubmitOutcome::Error);
	assert_eq!(form.errors_at(&path("fields")), [dynamic::DUPLICATE_FIELD_ID.to_string()]);
	assert_eq!(form.errors().keys().collect::<Vec<_>>(), ["fields"]);

	// the next submit sees distinct ids
	kit.use_field_dynamic(&form, "fields[1].id").on_change("age");
	assert_eq!(form.submit(), SubmitOutcome::Success);
	assert!(form.errors_at(&path("fields")).is_empty());
}

#[rstest]
fn test_definition_settings_default(definition: Value) {
	let config = submitted_definition(definition);
	assert_eq!(config.settings, FormSettings::default());
	assert_eq!(config.metadata.version, "1.0.0");
	assert_eq!(config.fields[0].custom_attributes.as_ref().unwrap()["autocomplete"], json!("email"));
}

#[rstest]
fn test_custom_attributes_through_string_paths(definition: Value) {
	let kit = dynamic::form().unwrap();
	let form = kit.use_form(FormOptions::default());
	form.load(definition);

	let test_id = kit.use_field_dynamic(&form, "fields[1].customAttributes.data-test");
	assert_eq!(test_id.value(), None);
	test_id.on_change("age-input");
	assert_eq!(test_id.value(), Some(json!("age-input")));
	let rows = kit.use_field_dynamic(&form, "fields[1].fieldSpecificSettings.editor.rows");
	rows.on_change(4);
	assert_eq!(form.value()["fields"][1]["fieldSpecificSettings"], json!({"editor": {"rows": 4}}));

	// record values must still be scalars
	let nested = kit.use_field_dynamic(&form, "fields[0].customAttributes.style.color");
	nested.on_change("red");
	assert_eq!(nested.value(), None);

	let received = Rc::new(RefCell::new(None));
	let sink = Rc::clone(&received);
	form.on_submit(move |config: DynamicFormConfig| *sink.borrow_mut() = Some(config));
	assert_eq!(form.submit(), SubmitOutcome::Success);
	let config = received.borrow_mut().take().unwrap();
	let attributes = config.fields[1].custom_attributes.clone().unwrap();
	assert_eq!(attributes["data-test"], json!("age-input"));
}

#[rstest]
fn test_generated_form_validates_its_fields(definition: Value) {
	let config = submitted_definition(definition);
	let kit = dynamic::data_form(&config).unwrap();
	assert_eq!(kit.name(), "Newsletter_signup");
	let form = kit.use_form(dynamic::data_options(&config));
	assert_eq!(form.id(), "newsletter-signup");
	assert_eq!(form.value(), json!({"email": "", "age": 0}));

	let email = kit.use_field_dynamic(&form, "email");
	let age = kit.use_field_dynamic(&form, "age");
	email.on_change("not-an-email");
	email.on_blur();
	assert_eq!(email.errors(), ["有効なメールアドレスを入力してください".to_string()]);
	age.on_change("16");
	age.on_blur();
	assert_eq!(age.errors(), ["Adults only".to_string()]);

	let received = Rc::new(RefCell::new(None));
	let sink = Rc::clone(&received);
	form.on_submit(move |data: DynamicFormData| *sink.borrow_mut() = Some(data));
	email.on_change("reader@example.com");
	age.on_change("30");
	assert_eq!(form.submit(), SubmitOutcome::Success);
	let data = received.borrow_mut().take().unwrap();
	assert_eq!(data["email"], json!("reader@example.com"));
	assert_eq!(data["age"], json!(30));
}

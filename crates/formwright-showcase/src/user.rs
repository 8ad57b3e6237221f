//! User registration form

use crate::{PHONE_NUMBER, PHONE_NUMBER_MESSAGE};
use formwright_forms::{FormKit, FormResult, create_form};
use formwright_schema::shape::{self, ObjectShape, Refinement, ShapeExt};
use formwright_schema::{Schema, SchemaResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

static NO_WHITESPACE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[^\s]+$").expect("valid whitespace regex"));

pub const PASSWORD_MISMATCH: &str = "パスワードが一致しません";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
	#[default]
	Ja,
	En,
	Zh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub password: String,
	pub confirm_password: String,
	pub age: Option<u8>,
	pub phone_number: Option<String>,
	pub terms_accepted: bool,
	pub newsletter_subscribed: bool,
	pub preferred_language: Language,
	pub interests: Option<Vec<String>>,
}

/// Registration filled in over several steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistrationDraft {
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub email: Option<String>,
	pub age: Option<u8>,
	pub phone_number: Option<String>,
	pub terms_accepted: Option<bool>,
	pub newsletter_subscribed: bool,
	pub preferred_language: Language,
	pub interests: Option<Vec<String>>,
}

/// At least one lowercase letter, one uppercase letter and one digit
fn is_complex(password: &str) -> bool {
	password.chars().any(|c| c.is_ascii_lowercase())
		&& password.chars().any(|c| c.is_ascii_uppercase())
		&& password.chars().any(|c| c.is_ascii_digit())
}

fn name_field(
	required: &'static str,
	too_long: &'static str,
	no_spaces: &'static str,
) -> shape::StringShape {
	shape::string()
		.type_message(required)
		.min(1, required)
		.max(50, too_long)
		.regex(NO_WHITESPACE.clone(), no_spaces)
}

fn passwords_match() -> Refinement {
	Refinement::new(PASSWORD_MISMATCH, |value| {
		value.get("password").and_then(Value::as_str) == value.get("confirmPassword").and_then(Value::as_str)
	})
	.at("confirmPassword")
	.depends_on(["password"])
}

pub fn registration_shape() -> ObjectShape {
	let email_message = "有効なメールアドレスを入力してください";
	shape::object()
		.field(
			"firstName",
			name_field(
				"名前を入力してください",
				"名前は50文字以内で入力してください",
				"名前にスペースは含められません",
			),
		)
		.field(
			"lastName",
			name_field(
				"姓を入力してください",
				"姓は50文字以内で入力してください",
				"姓にスペースは含められません",
			),
		)
		.field(
			"email",
			shape::string()
				.type_message(email_message)
				.email(email_message)
				.to_lower_case()
				.trim(),
		)
		.field(
			"password",
			shape::string()
				.type_message("パスワードは8文字以上で入力してください")
				.min(8, "パスワードは8文字以上で入力してください")
				.max(100, "パスワードは100文字以内で入力してください")
				.refine(is_complex, "パスワードは英大文字、小文字、数字を含む必要があります"),
		)
		.field("confirmPassword", shape::string())
		.field(
			"age",
			shape::number()
				.int("年齢は整数で入力してください")
				.min(13.0, "13歳以上である必要があります")
				.max(120.0, "有効な年齢を入力してください")
				.optional(),
		)
		.field(
			"phoneNumber",
			shape::string()
				.regex(PHONE_NUMBER.clone(), PHONE_NUMBER_MESSAGE)
				.optional(),
		)
		.field(
			"termsAccepted",
			shape::boolean()
				.type_message("利用規約に同意する必要があります")
				.refine(|accepted| accepted, "利用規約に同意する必要があります"),
		)
		.field("newsletterSubscribed", shape::boolean().with_default(false))
		.field(
			"preferredLanguage",
			shape::enumeration(["ja", "en", "zh"])
				.message("言語を選択してください")
				.with_default("ja"),
		)
		.field("interests", shape::array(shape::string()).optional())
		.refine(passwords_match())
}

pub fn schema() -> SchemaResult<Schema> {
	Schema::new(registration_shape())
}

/// Every field optional; the confirmation rule still applies
pub fn draft_schema() -> SchemaResult<Schema> {
	Schema::new(registration_shape().partial())
}

pub fn form() -> FormResult<FormKit<UserRegistration>> {
	create_form(schema()?, "UserRegistration")
}

pub fn draft_form() -> FormResult<FormKit<UserRegistrationDraft>> {
	create_form(draft_schema()?, "UserRegistrationDraft")
}

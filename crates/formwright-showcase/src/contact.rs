//! Contact form
//!
//! The full inquiry form, a short variant with just the essentials, and a
//! draft variant that can be saved before the required fields are filled.

use crate::{PHONE_NUMBER, PHONE_NUMBER_MESSAGE};
use formwright_forms::{FormKit, FormResult, create_form};
use formwright_schema::shape::{self, ObjectShape, Refinement, ShapeExt};
use formwright_schema::{Schema, SchemaResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

static MIME_TYPE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[a-z]+/[a-z0-9\-+.]+$").expect("valid MIME type regex"));

/// Largest accepted attachment, in bytes
pub const MAX_ATTACHMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Fields kept by the simple variant
pub const SIMPLE_FIELDS: [&str; 6] = [
	"firstName",
	"lastName",
	"email",
	"subject",
	"message",
	"privacyPolicyAccepted",
];

/// Fields a draft may leave empty
pub const DRAFT_OPTIONAL_FIELDS: [&str; 7] = [
	"firstName",
	"lastName",
	"email",
	"subject",
	"message",
	"contactType",
	"privacyPolicyAccepted",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
	General,
	Support,
	Sales,
	Technical,
	Billing,
	Partnership,
	Press,
	Other,
}

impl ContactType {
	pub const ALL: [&'static str; 8] = [
		"general",
		"support",
		"sales",
		"technical",
		"billing",
		"partnership",
		"press",
		"other",
	];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
	Low,
	#[default]
	Normal,
	High,
	Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
	#[default]
	Email,
	Phone,
	Both,
}

impl ContactMethod {
	pub fn needs_phone(self) -> bool {
		matches!(self, ContactMethod::Phone | ContactMethod::Both)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
	pub file_name: String,
	pub file_size: f64,
	pub file_type: String,
	pub file_url: String,
}

/// Browser details attached for troubleshooting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
	pub browser: Option<String>,
	pub operating_system: Option<String>,
	pub screen_resolution: Option<String>,
	pub user_agent: Option<String>,
}

/// A validated inquiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub phone_number: Option<String>,
	pub company: Option<String>,
	pub job_title: Option<String>,
	pub contact_type: ContactType,
	pub subject: String,
	pub message: String,
	pub priority: Priority,
	pub attachments: Option<Vec<Attachment>>,
	pub system_info: Option<SystemInfo>,
	pub preferred_contact_method: ContactMethod,
	pub best_time_to_contact: Option<String>,
	pub allow_marketing_emails: bool,
	pub subscribe_to_newsletter: bool,
	pub privacy_policy_accepted: bool,
	pub source: Option<String>,
	pub custom_fields: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleContactForm {
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub subject: String,
	pub message: String,
	pub privacy_policy_accepted: bool,
}

/// A saved, possibly incomplete inquiry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub email: Option<String>,
	pub phone_number: Option<String>,
	pub contact_type: Option<ContactType>,
	pub subject: Option<String>,
	pub message: Option<String>,
	pub priority: Priority,
	pub preferred_contact_method: ContactMethod,
	pub privacy_policy_accepted: Option<bool>,
}

fn name_field(required: &'static str, too_long: &'static str) -> shape::StringShape {
	shape::string()
		.type_message(required)
		.min(1, required)
		.max(50, too_long)
		.trim()
}

fn attachment_shape() -> ObjectShape {
	shape::object()
		.field(
			"fileName",
			shape::string().max(255, "ファイル名は255文字以内で入力してください"),
		)
		.field(
			"fileSize",
			shape::number().max(
				MAX_ATTACHMENT_SIZE as f64,
				"ファイルサイズは10MB以下である必要があります",
			),
		)
		.field(
			"fileType",
			shape::string().regex(MIME_TYPE.clone(), "有効なMIMEタイプを指定してください"),
		)
		.field(
			"fileUrl",
			shape::string().url("有効なURL形式で入力してください"),
		)
}

fn system_info_shape() -> ObjectShape {
	shape::object()
		.field(
			"browser",
			shape::string()
				.max(100, "ブラウザ情報は100文字以内で入力してください")
				.optional(),
		)
		.field(
			"operatingSystem",
			shape::string()
				.max(100, "OS情報は100文字以内で入力してください")
				.optional(),
		)
		.field(
			"screenResolution",
			shape::string()
				.max(50, "画面解像度は50文字以内で入力してください")
				.optional(),
		)
		.field(
			"userAgent",
			shape::string()
				.max(500, "ユーザーエージェントは500文字以内で入力してください")
				.optional(),
		)
}

/// Phone contact needs a number to call
fn phone_required() -> Refinement {
	Refinement::new(
		"電話での連絡をご希望の場合は電話番号を入力してください",
		|value| {
			let method = value.get("preferredContactMethod").and_then(Value::as_str);
			let has_phone = value
				.get("phoneNumber")
				.and_then(Value::as_str)
				.is_some_and(|phone| !phone.is_empty());
			!matches!(method, Some("phone" | "both")) || has_phone
		},
	)
	.at("phoneNumber")
	.depends_on(["preferredContactMethod"])
}

/// The full contact object, before it is wrapped in a [`Schema`]
pub fn contact_shape() -> ObjectShape {
	let email_message = "有効なメールアドレスを入力してください";
	shape::object()
		.field("firstName", name_field("名前を入力してください", "名前は50文字以内で入力してください"))
		.field("lastName", name_field("姓を入力してください", "姓は50文字以内で入力してください"))
		.field(
			"email",
			shape::string()
				.type_message(email_message)
				.email(email_message)
				.to_lower_case()
				.trim(),
		)
		.field(
			"phoneNumber",
			shape::string()
				.regex(PHONE_NUMBER.clone(), PHONE_NUMBER_MESSAGE)
				.optional(),
		)
		.field(
			"company",
			shape::string()
				.max(100, "会社名は100文字以内で入力してください")
				.trim()
				.optional(),
		)
		.field(
			"jobTitle",
			shape::string()
				.max(50, "職業・役職は50文字以内で入力してください")
				.trim()
				.optional(),
		)
		.field(
			"contactType",
			shape::enumeration(ContactType::ALL).message("お問い合わせ種別を選択してください"),
		)
		.field(
			"subject",
			shape::string()
				.type_message("件名を入力してください")
				.min(1, "件名を入力してください")
				.max(200, "件名は200文字以内で入力してください")
				.trim(),
		)
		.field(
			"message",
			shape::string()
				.type_message("お問い合わせ内容は10文字以上で入力してください")
				.min(10, "お問い合わせ内容は10文字以上で入力してください")
				.max(2000, "お問い合わせ内容は2000文字以内で入力してください")
				.trim(),
		)
		.field(
			"priority",
			shape::enumeration(["low", "normal", "high", "urgent"])
				.message("優先度を選択してください")
				.with_default("normal"),
		)
		.field(
			"attachments",
			shape::array(attachment_shape())
				.max(5, "添付ファイルは最大5個まで登録できます")
				.optional(),
		)
		.field("systemInfo", system_info_shape().optional())
		.field(
			"preferredContactMethod",
			shape::enumeration(["email", "phone", "both"])
				.message("希望連絡方法を選択してください")
				.with_default("email"),
		)
		.field(
			"bestTimeToContact",
			shape::string()
				.max(100, "連絡希望時間は100文字以内で入力してください")
				.optional(),
		)
		.field("allowMarketingEmails", shape::boolean().with_default(false))
		.field("subscribeToNewsletter", shape::boolean().with_default(false))
		.field(
			"privacyPolicyAccepted",
			shape::boolean()
				.type_message("プライバシーポリシーに同意する必要があります")
				.refine(|accepted| accepted, "プライバシーポリシーに同意する必要があります"),
		)
		.field(
			"source",
			shape::string()
				.max(100, "参照元は100文字以内で入力してください")
				.optional(),
		)
		.field("customFields", shape::record(shape::any()).optional())
		.refine(phone_required())
}

pub fn schema() -> SchemaResult<Schema> {
	Schema::new(contact_shape())
}

/// Essentials only; the phone rule goes away with the phone fields
pub fn simple_schema() -> SchemaResult<Schema> {
	Schema::new(contact_shape().pick(SIMPLE_FIELDS)?)
}

pub fn draft_schema() -> SchemaResult<Schema> {
	Schema::new(contact_shape().partial_fields(DRAFT_OPTIONAL_FIELDS)?)
}

pub fn form() -> FormResult<FormKit<ContactForm>> {
	create_form(schema()?, "Contact")
}

pub fn simple_form() -> FormResult<FormKit<SimpleContactForm>> {
	create_form(simple_schema()?, "SimpleContact")
}

pub fn draft_form() -> FormResult<FormKit<ContactDraft>> {
	create_form(draft_schema()?, "ContactDraft")
}

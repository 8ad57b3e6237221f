//! Dynamic form builder
//!
//! A form whose value is itself a form definition: the field list, layout
//! settings and bookkeeping metadata. [`data_schema`] turns a validated
//! definition into the schema of the form it describes. Field names of
//! such a form are only known at runtime, so it is driven through
//! [`FormKit::use_field_dynamic`].

use chrono::{DateTime, Utc};
use formwright_forms::{FormKit, FormOptions, FormResult, ValidationTrigger, create_form};
use formwright_schema::shape::{self, NumberShape, ObjectShape, Refinement, ShapeExt, StringShape};
use formwright_schema::{Schema, SchemaResult, Shape};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").expect("valid identifier regex"));

static NON_ID_CHARS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid identifier separator regex"));

pub const DUPLICATE_FIELD_ID: &str = "フィールドIDが重複しています";

pub const MAX_FIELDS: usize = 100;

/// Submitted values of a generated form, keyed by field id
pub type DynamicFormData = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
	Text,
	Email,
	Password,
	Number,
	Tel,
	Url,
	Textarea,
	Select,
	Multiselect,
	Radio,
	Checkbox,
	File,
	Date,
	DatetimeLocal,
	Time,
	Color,
	Range,
	Hidden,
}

impl FieldType {
	pub const ALL: [&'static str; 18] = [
		"text",
		"email",
		"password",
		"number",
		"tel",
		"url",
		"textarea",
		"select",
		"multiselect",
		"radio",
		"checkbox",
		"file",
		"date",
		"datetime-local",
		"time",
		"color",
		"range",
		"hidden",
	];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
	Required,
	MinLength,
	MaxLength,
	Min,
	Max,
	Pattern,
	Email,
	Url,
	Custom,
}

impl RuleKind {
	pub const ALL: [&'static str; 9] = [
		"required",
		"minLength",
		"maxLength",
		"min",
		"max",
		"pattern",
		"email",
		"url",
		"custom",
	];
}

/// String, number or flag carried by rules and options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
	Flag(bool),
	Number(f64),
	Text(String),
}

impl ScalarValue {
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			ScalarValue::Number(n) => Some(*n),
			ScalarValue::Text(s) => s.trim().parse().ok(),
			ScalarValue::Flag(_) => None,
		}
	}

	fn as_count(&self) -> Option<usize> {
		self.as_f64()
			.filter(|n| *n >= 0.0 && n.fract() == 0.0)
			.map(|n| n as usize)
	}

	/// The value as a browser would submit it
	pub fn as_text(&self) -> String {
		match self {
			ScalarValue::Flag(flag) => flag.to_string(),
			ScalarValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
			ScalarValue::Number(n) => n.to_string(),
			ScalarValue::Text(s) => s.clone(),
		}
	}

	pub fn to_value(&self) -> Value {
		match self {
			ScalarValue::Flag(flag) => Value::Bool(*flag),
			ScalarValue::Number(n) if n.fract() == 0.0 => Value::from(*n as i64),
			ScalarValue::Number(n) => Value::from(*n),
			ScalarValue::Text(s) => Value::String(s.clone()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
	Scalar(ScalarValue),
	List(Vec<ScalarValue>),
}

impl DefaultValue {
	pub fn to_value(&self) -> Value {
		match self {
			DefaultValue::Scalar(scalar) => scalar.to_value(),
			DefaultValue::List(items) => items.iter().map(ScalarValue::to_value).collect(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
	#[serde(rename = "type")]
	pub kind: RuleKind,
	pub value: Option<ScalarValue>,
	pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
	pub label: String,
	pub value: ScalarValue,
	#[serde(default)]
	pub disabled: bool,
	#[serde(default)]
	pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
	Equals,
	NotEquals,
	Contains,
	NotContains,
	GreaterThan,
	LessThan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
	Show,
	Hide,
	Enable,
	Disable,
	Require,
	Optional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
	pub depends_on: String,
	pub condition: Condition,
	pub value: ScalarValue,
	pub action: RuleAction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldWidth {
	#[default]
	Full,
	Half,
	Third,
	Quarter,
	Auto,
}

/// One field of a generated form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicField {
	pub id: String,
	pub name: String,
	#[serde(rename = "type")]
	pub field_type: FieldType,
	pub label: String,
	pub placeholder: Option<String>,
	pub help_text: Option<String>,
	pub default_value: Option<DefaultValue>,
	#[serde(default)]
	pub validations: Vec<ValidationRule>,
	pub options: Option<Vec<FieldOption>>,
	#[serde(default)]
	pub required: bool,
	#[serde(default)]
	pub disabled: bool,
	#[serde(default)]
	pub readonly: bool,
	#[serde(default)]
	pub hidden: bool,
	#[serde(default)]
	pub width: FieldWidth,
	#[serde(default)]
	pub order: u32,
	#[serde(default)]
	pub conditional_rules: Vec<ConditionalRule>,
	pub custom_attributes: Option<Map<String, Value>>,
	pub field_specific_settings: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
	#[default]
	Vertical,
	Horizontal,
	Grid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
	Compact,
	#[default]
	Normal,
	Relaxed,
}

/// Presentation and behaviour of a generated form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSettings {
	pub submit_button_text: String,
	pub reset_button_text: String,
	pub enable_reset: bool,
	pub enable_draft: bool,
	pub auto_save: bool,
	/// Seconds between automatic saves
	pub auto_save_interval: u32,
	pub validate_on_blur: bool,
	pub validate_on_change: bool,
	pub show_error_summary: bool,
	pub layout: Layout,
	pub columns: u8,
	pub spacing: Spacing,
	pub theme: String,
	pub custom_css: Option<String>,
	pub aria_label: Option<String>,
	pub aria_description: Option<String>,
}

impl Default for FormSettings {
	fn default() -> Self {
		Self {
			submit_button_text: "送信".to_string(),
			reset_button_text: "リセット".to_string(),
			enable_reset: true,
			enable_draft: false,
			auto_save: false,
			auto_save_interval: 30,
			validate_on_blur: true,
			validate_on_change: false,
			show_error_summary: true,
			layout: Layout::Vertical,
			columns: 1,
			spacing: Spacing::Normal,
			theme: "default".to_string(),
			custom_css: None,
			aria_label: None,
			aria_description: None,
		}
	}
}

impl FormSettings {
	/// Validation trigger the settings ask for; change wins over blur
	pub fn validation_trigger(&self) -> ValidationTrigger {
		if self.validate_on_change {
			ValidationTrigger::OnInput
		} else if self.validate_on_blur {
			ValidationTrigger::OnBlur
		} else {
			ValidationTrigger::OnSubmit
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DefinitionMetadata {
	pub version: String,
	pub created_at: Option<DateTime<Utc>>,
	pub updated_at: Option<DateTime<Utc>>,
	pub created_by: Option<String>,
	pub tags: Vec<String>,
}

impl Default for DefinitionMetadata {
	fn default() -> Self {
		Self {
			version: "1.0.0".to_string(),
			created_at: None,
			updated_at: None,
			created_by: None,
			tags: Vec::new(),
		}
	}
}

/// A validated form definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFormConfig {
	pub id: String,
	pub name: String,
	pub title: String,
	pub description: Option<String>,
	pub fields: Vec<DynamicField>,
	#[serde(default)]
	pub settings: FormSettings,
	#[serde(default)]
	pub metadata: DefinitionMetadata,
}

fn scalar() -> Shape {
	shape::union([
		shape::string().into_shape(),
		shape::number().into_shape(),
		shape::boolean().into_shape(),
	])
	.into_shape()
}

fn identifier(missing: &'static str, invalid: &'static str) -> StringShape {
	shape::string()
		.type_message(missing)
		.min(1, missing)
		.regex(IDENTIFIER.clone(), invalid)
}

fn text(missing: &'static str, max: usize, too_long: &'static str) -> StringShape {
	shape::string().type_message(missing).min(1, missing).max(max, too_long)
}

/// UTC timestamp in RFC 3339 form, e.g. `2024-01-01T00:00:00Z`
fn is_utc_timestamp(value: &str) -> bool {
	value.ends_with('Z') && DateTime::parse_from_rfc3339(value).is_ok()
}

pub fn validation_rule_shape() -> ObjectShape {
	shape::object()
		.field(
			"type",
			shape::enumeration(RuleKind::ALL).message("バリデーションの種類を選択してください"),
		)
		.field("value", scalar().optional())
		.field(
			"message",
			shape::string().type_message("エラーメッセージを入力してください"),
		)
}

pub fn field_option_shape() -> ObjectShape {
	shape::object()
		.field(
			"label",
			shape::string()
				.type_message("ラベルを入力してください")
				.min(1, "ラベルを入力してください"),
		)
		.field("value", scalar())
		.field("disabled", shape::boolean().with_default(false))
		.field("selected", shape::boolean().with_default(false))
}

pub fn conditional_rule_shape() -> ObjectShape {
	shape::object()
		.field(
			"dependsOn",
			shape::string()
				.type_message("依存フィールドを指定してください")
				.min(1, "依存フィールドを指定してください"),
		)
		.field(
			"condition",
			shape::enumeration([
				"equals",
				"notEquals",
				"contains",
				"notContains",
				"greaterThan",
				"lessThan",
			])
			.message("条件を選択してください"),
		)
		.field("value", scalar())
		.field(
			"action",
			shape::enumeration(["show", "hide", "enable", "disable", "require", "optional"])
				.message("動作を選択してください"),
		)
}

pub fn field_shape() -> ObjectShape {
	shape::object()
		.field(
			"id",
			identifier(
				"フィールドIDを入力してください",
				"フィールドIDは英字から始まり、英数字、アンダースコア、ハイフンのみ使用できます",
			),
		)
		.field(
			"name",
			text(
				"フィールド名を入力してください",
				100,
				"フィールド名は100文字以内で入力してください",
			),
		)
		.field(
			"type",
			shape::enumeration(FieldType::ALL).message("フィールドタイプを選択してください"),
		)
		.field(
			"label",
			text("ラベルを入力してください", 200, "ラベルは200文字以内で入力してください"),
		)
		.field(
			"placeholder",
			shape::string()
				.max(200, "プレースホルダーは200文字以内で入力してください")
				.optional(),
		)
		.field(
			"helpText",
			shape::string()
				.max(500, "ヘルプテキストは500文字以内で入力してください")
				.optional(),
		)
		.field(
			"defaultValue",
			shape::union([
				shape::string().into_shape(),
				shape::number().into_shape(),
				shape::boolean().into_shape(),
				shape::array(shape::union([
					shape::string().into_shape(),
					shape::number().into_shape(),
				]))
				.into_shape(),
			])
			.optional(),
		)
		.field("validations", shape::array(validation_rule_shape()))
		.field("options", shape::array(field_option_shape()).optional())
		.field("required", shape::boolean().with_default(false))
		.field("disabled", shape::boolean().with_default(false))
		.field("readonly", shape::boolean().with_default(false))
		.field("hidden", shape::boolean().with_default(false))
		.field(
			"width",
			shape::enumeration(["full", "half", "third", "quarter", "auto"])
				.message("幅を選択してください")
				.with_default("full"),
		)
		.field(
			"order",
			shape::number()
				.int("表示順は整数で入力してください")
				.min(0.0, "表示順は0以上で入力してください")
				.with_default(0),
		)
		.field("conditionalRules", shape::array(conditional_rule_shape()))
		.field("customAttributes", shape::record(scalar()).optional())
		.field("fieldSpecificSettings", shape::record(shape::any()).optional())
}

fn settings_shape() -> ObjectShape {
	shape::object()
		.field(
			"submitButtonText",
			shape::string()
				.max(50, "送信ボタンテキストは50文字以内で入力してください")
				.with_default("送信"),
		)
		.field(
			"resetButtonText",
			shape::string()
				.max(50, "リセットボタンテキストは50文字以内で入力してください")
				.with_default("リセット"),
		)
		.field("enableReset", shape::boolean().with_default(true))
		.field("enableDraft", shape::boolean().with_default(false))
		.field("autoSave", shape::boolean().with_default(false))
		.field(
			"autoSaveInterval",
			shape::number()
				.int("自動保存間隔は整数で入力してください")
				.min(10.0, "自動保存間隔は10秒以上で入力してください")
				.max(300.0, "自動保存間隔は300秒以内で入力してください")
				.with_default(30),
		)
		.field("validateOnBlur", shape::boolean().with_default(true))
		.field("validateOnChange", shape::boolean().with_default(false))
		.field("showErrorSummary", shape::boolean().with_default(true))
		.field(
			"layout",
			shape::enumeration(["vertical", "horizontal", "grid"])
				.message("レイアウトを選択してください")
				.with_default("vertical"),
		)
		.field(
			"columns",
			shape::number()
				.int("列数は整数で入力してください")
				.min(1.0, "列数は1以上で入力してください")
				.max(4.0, "列数は4以下で入力してください")
				.with_default(1),
		)
		.field(
			"spacing",
			shape::enumeration(["compact", "normal", "relaxed"])
				.message("余白を選択してください")
				.with_default("normal"),
		)
		.field(
			"theme",
			shape::string()
				.max(50, "テーマ名は50文字以内で入力してください")
				.with_default("default"),
		)
		.field(
			"customCss",
			shape::string()
				.max(5000, "カスタムCSSは5000文字以内で入力してください")
				.optional(),
		)
		.field(
			"ariaLabel",
			shape::string()
				.max(200, "ARIAラベルは200文字以内で入力してください")
				.optional(),
		)
		.field(
			"ariaDescription",
			shape::string()
				.max(500, "ARIA説明は500文字以内で入力してください")
				.optional(),
		)
}

fn metadata_shape() -> ObjectShape {
	let timestamp = || {
		shape::string()
			.refine(is_utc_timestamp, "日時はISO 8601形式（UTC）で入力してください")
			.optional()
	};
	shape::object()
		.field("version", shape::string().with_default("1.0.0"))
		.field("createdAt", timestamp())
		.field("updatedAt", timestamp())
		.field(
			"createdBy",
			shape::string()
				.max(100, "作成者名は100文字以内で入力してください")
				.optional(),
		)
		.field(
			"tags",
			shape::array(shape::string().max(50, "タグは50文字以内で入力してください"))
				.max(10, "タグは最大10個まで設定できます"),
		)
}

fn unique_field_ids() -> Refinement {
	Refinement::new(DUPLICATE_FIELD_ID, |config: &Value| {
		let Some(fields) = config.get("fields").and_then(Value::as_array) else {
			return true;
		};
		let mut seen = HashSet::new();
		fields
			.iter()
			.filter_map(|field| field.get("id").and_then(Value::as_str))
			.all(|id| seen.insert(id))
	})
	.at("fields")
	.depends_on(["fields"])
}

pub fn config_shape() -> ObjectShape {
	shape::object()
		.field(
			"id",
			identifier(
				"フォームIDを入力してください",
				"フォームIDは英字から始まり、英数字、アンダースコア、ハイフンのみ使用できます",
			),
		)
		.field(
			"name",
			text("フォーム名を入力してください", 200, "フォーム名は200文字以内で入力してください"),
		)
		.field(
			"title",
			text(
				"フォームタイトルを入力してください",
				200,
				"フォームタイトルは200文字以内で入力してください",
			),
		)
		.field(
			"description",
			shape::string()
				.max(1000, "フォーム説明は1000文字以内で入力してください")
				.optional(),
		)
		.field(
			"fields",
			shape::array(field_shape())
				.min(1, "最低1つのフィールドが必要です")
				.max(MAX_FIELDS, "フィールドは最大100個まで設定できます"),
		)
		.field("settings", settings_shape().with_default(Map::new()))
		.field("metadata", metadata_shape().with_default(Map::new()))
		.refine(unique_field_ids())
}

pub fn schema() -> SchemaResult<Schema> {
	Schema::new(config_shape())
}

/// Form editing a definition
pub fn form() -> FormResult<FormKit<DynamicFormConfig>> {
	create_form(schema()?, "DynamicForm")
}

/// Field id derived from a label: lowercase ASCII letters and digits
/// joined by single underscores. Labels without any yield `""`.
///
/// # Examples
///
/// ```
/// use formwright_showcase::dynamic::create_field_id;
///
/// assert_eq!(create_field_id("Phone Number (Mobile)"), "phone_number_mobile");
/// assert_eq!(create_field_id("お名前"), "");
/// ```
pub fn create_field_id(label: &str) -> String {
	NON_ID_CHARS
		.replace_all(&label.to_lowercase(), "_")
		.trim_matches('_')
		.to_string()
}

/// The field's declared default, else the empty value of its type
pub fn field_default_value(field: &DynamicField) -> Value {
	if let Some(value) = &field.default_value {
		return value.to_value();
	}
	match field.field_type {
		FieldType::Checkbox => Value::Bool(false),
		FieldType::Multiselect => Value::Array(Vec::new()),
		FieldType::Number | FieldType::Range => Value::from(0),
		_ => Value::String(String::new()),
	}
}

fn required_message(field: &DynamicField) -> Option<String> {
	field
		.validations
		.iter()
		.find(|rule| rule.kind == RuleKind::Required)
		.map(|rule| rule.message.clone())
		.or_else(|| field.required.then(|| format!("{}を入力してください", field.label)))
}

fn skip_rule(field: &DynamicField, rule: &ValidationRule) {
	tracing::debug!(field = %field.id, rule = ?rule.kind, "Rule does not apply to this field type");
}

fn string_field(field: &DynamicField, message: &str) -> SchemaResult<StringShape> {
	let mut string = shape::string().type_message(message);
	match field.field_type {
		FieldType::Email => string = string.email("有効なメールアドレスを入力してください"),
		FieldType::Url => string = string.url("有効なURLを入力してください"),
		_ => {}
	}
	for rule in &field.validations {
		let count = rule.value.as_ref().and_then(ScalarValue::as_count);
		string = match (rule.kind, &rule.value, count) {
			(RuleKind::Required, ..) => string.min(1, rule.message.as_str()),
			(RuleKind::MinLength, _, Some(length)) => string.min(length, rule.message.as_str()),
			(RuleKind::MaxLength, _, Some(length)) => string.max(length, rule.message.as_str()),
			(RuleKind::Pattern, Some(ScalarValue::Text(pattern)), _) => {
				string.try_pattern(pattern, rule.message.as_str())?
			}
			(RuleKind::Email, ..) => string.email(rule.message.as_str()),
			(RuleKind::Url, ..) => string.url(rule.message.as_str()),
			_ => {
				skip_rule(field, rule);
				string
			}
		};
	}
	Ok(string)
}

fn number_field(field: &DynamicField, message: &str) -> NumberShape {
	let mut number = shape::number().type_message(message);
	for rule in &field.validations {
		let bound = rule.value.as_ref().and_then(ScalarValue::as_f64);
		number = match (rule.kind, bound) {
			(RuleKind::Required, _) => number,
			(RuleKind::Min, Some(min)) => number.min(min, rule.message.as_str()),
			(RuleKind::Max, Some(max)) => number.max(max, rule.message.as_str()),
			_ => {
				skip_rule(field, rule);
				number
			}
		};
	}
	number
}

fn choice(field: &DynamicField, message: &str) -> Option<Shape> {
	let options = field.options.as_ref().filter(|options| !options.is_empty())?;
	let values = options.iter().map(|option| option.value.as_text());
	Some(shape::enumeration(values).message(message).into_shape())
}

fn data_field_shape(field: &DynamicField) -> SchemaResult<Shape> {
	let required = required_message(field);
	let message = required
		.clone()
		.unwrap_or_else(|| format!("{}を正しく入力してください", field.label));
	let shape = match field.field_type {
		FieldType::Number | FieldType::Range => number_field(field, &message).into_shape(),
		FieldType::Checkbox if required.is_some() => shape::boolean()
			.type_message(message.as_str())
			.refine(|checked| checked, message.as_str())
			.into_shape(),
		FieldType::Checkbox => shape::boolean().type_message(message.as_str()).into_shape(),
		FieldType::Multiselect => {
			let element = choice(field, &message).unwrap_or_else(|| shape::string().into_shape());
			let list = shape::array(element);
			match &required {
				Some(message) => list.min(1, message.as_str()).into_shape(),
				None => list.into_shape(),
			}
		}
		FieldType::File => shape::any(),
		FieldType::Date => shape::date().type_message(message.as_str()).into_shape(),
		FieldType::Select | FieldType::Radio => match choice(field, &message) {
			Some(choice) => choice,
			None => string_field(field, &message)?.into_shape(),
		},
		_ => string_field(field, &message)?.into_shape(),
	};
	Ok(match (&field.default_value, &required) {
		(Some(default), _) => shape.with_default(default.to_value()),
		(None, None) => shape.optional(),
		(None, Some(_)) => shape,
	})
}

/// Schema of the form a definition describes.
///
/// Fields are keyed by id and declared in `order`; ties keep definition
/// order. Rules that do not fit a field's type, and `custom` rules, are
/// left to the caller.
pub fn data_schema(config: &DynamicFormConfig) -> SchemaResult<Schema> {
	let mut fields: Vec<&DynamicField> = config.fields.iter().collect();
	fields.sort_by_key(|field| field.order);
	let mut object = shape::object();
	for field in fields {
		object = object.field(field.id.as_str(), data_field_shape(field)?);
	}
	Schema::new(object)
}

/// Form name for a definition id: `contact-us` becomes `Contact_us`
fn form_name(id: &str) -> String {
	let mut chars = id.chars();
	let first = chars.next().map(|c| c.to_ascii_uppercase());
	first
		.into_iter()
		.chain(chars.map(|c| if c == '-' { '_' } else { c }))
		.collect()
}

/// Form generated from a definition
pub fn data_form(config: &DynamicFormConfig) -> FormResult<FormKit<DynamicFormData>> {
	create_form(data_schema(config)?, &form_name(&config.id))
}

/// Options for a generated form: its id, the trigger the settings ask
/// for, and every field's starting value
pub fn data_options(config: &DynamicFormConfig) -> FormOptions {
	let initial: DynamicFormData = config
		.fields
		.iter()
		.map(|field| (field.id.clone(), field_default_value(field)))
		.collect();
	FormOptions::new()
		.with_id(config.id.as_str())
		.validate_on(config.settings.validation_trigger())
		.with_default_value(Value::Object(initial))
}

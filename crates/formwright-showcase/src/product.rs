//! Product registration form
//!
//! Listing a product either publishes it (`intent=submit`) or saves a
//! draft (`intent=draft`). Drafts validate against [`draft_schema`], which
//! lets the descriptive fields stay empty.

use formwright_forms::{FormKit, FormResult, create_form};
use formwright_schema::shape::{self, NumberShape, ObjectShape, Refinement, ShapeExt};
use formwright_schema::{Schema, SchemaResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

static SKU: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9_-]+$").expect("valid SKU regex"));

pub const MAX_PRICE: f64 = 10_000_000.0;

pub const PRICE_ABOVE_LIST: &str = "販売価格は定価より安く設定してください";

/// Fields a draft may leave empty
pub const DRAFT_OPTIONAL_FIELDS: [&str; 6] = ["name", "description", "price", "category", "condition", "images"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingIntent {
	Submit,
	Draft,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
	#[default]
	Jpy,
	Usd,
	Eur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	Electronics,
	Clothing,
	Books,
	Home,
	Sports,
	Toys,
	Beauty,
	Automotive,
	Food,
	Other,
}

impl Category {
	pub const ALL: [&'static str; 10] = [
		"electronics",
		"clothing",
		"books",
		"home",
		"sports",
		"toys",
		"beauty",
		"automotive",
		"food",
		"other",
	];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
	New,
	LikeNew,
	Good,
	Fair,
	Poor,
}

impl Condition {
	pub const ALL: [&'static str; 5] = ["new", "like-new", "good", "fair", "poor"];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
	#[default]
	Cm,
	Inch,
	M,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
	#[default]
	G,
	Kg,
	Lb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
	pub length: Option<f64>,
	pub width: Option<f64>,
	pub height: Option<f64>,
	pub unit: LengthUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weight {
	pub value: f64,
	pub unit: WeightUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRegistration {
	pub intent: Option<ListingIntent>,
	pub name: String,
	pub description: String,
	pub price: f64,
	pub original_price: Option<f64>,
	pub currency: Currency,
	pub category: Category,
	pub subcategory: Option<String>,
	pub brand: Option<String>,
	pub model: Option<String>,
	pub condition: Condition,
	pub quantity: u32,
	pub dimensions: Option<Dimensions>,
	pub weight: Option<Weight>,
	pub images: Vec<String>,
	pub tags: Option<Vec<String>>,
	pub is_available: bool,
	pub is_featured: bool,
	pub allow_backorder: bool,
	pub sku: Option<String>,
	pub manufacturer_part_number: Option<String>,
}

/// Price-like amount: positive, capped, at most two decimals
fn amount(label: &str) -> NumberShape {
	shape::number()
		.type_message(format!("{label}を入力してください"))
		.positive(format!("{label}は正の数で入力してください"))
		.max(MAX_PRICE, format!("{label}は1000万円以下で入力してください"))
		.multiple_of(0.01, format!("{label}は小数点以下2桁まで入力してください"))
}

fn positive_length(message: &str) -> shape::Shape {
	shape::number().positive(message).optional()
}

/// A sale price must undercut the list price when one is given
fn below_list_price() -> Refinement {
	Refinement::new(PRICE_ABOVE_LIST, |value| {
		let price = value.get("price").and_then(Value::as_f64);
		let original = value
			.get("originalPrice")
			.and_then(Value::as_f64)
			.filter(|original| *original != 0.0);
		match (price, original) {
			(Some(price), Some(original)) => price < original,
			_ => true,
		}
	})
	.at("price")
	.depends_on(["originalPrice"])
}

pub fn registration_shape() -> ObjectShape {
	shape::object()
		.field("intent", shape::enumeration(["submit", "draft"]).optional())
		.field(
			"name",
			shape::string()
				.type_message("商品名を入力してください")
				.min(1, "商品名を入力してください")
				.max(100, "商品名は100文字以内で入力してください")
				.trim(),
		)
		.field(
			"description",
			shape::string()
				.type_message("商品説明は10文字以上で入力してください")
				.min(10, "商品説明は10文字以上で入力してください")
				.max(1000, "商品説明は1000文字以内で入力してください")
				.trim(),
		)
		.field("price", amount("価格"))
		.field("originalPrice", amount("定価").optional())
		.field(
			"currency",
			shape::enumeration(["JPY", "USD", "EUR"])
				.message("通貨を選択してください")
				.with_default("JPY"),
		)
		.field(
			"category",
			shape::enumeration(Category::ALL).message("カテゴリを選択してください"),
		)
		.field("subcategory", shape::string().optional())
		.field(
			"brand",
			shape::string()
				.max(50, "ブランド名は50文字以内で入力してください")
				.optional(),
		)
		.field(
			"model",
			shape::string()
				.max(50, "モデル名は50文字以内で入力してください")
				.optional(),
		)
		.field(
			"condition",
			shape::enumeration(Condition::ALL).message("商品状態を選択してください"),
		)
		.field(
			"quantity",
			shape::number()
				.int("在庫数は整数で入力してください")
				.min(0.0, "在庫数は0以上で入力してください")
				.max(99_999.0, "在庫数は99999以下で入力してください")
				.with_default(1),
		)
		.field(
			"dimensions",
			shape::object()
				.field("length", positive_length("長さは正の数で入力してください"))
				.field("width", positive_length("幅は正の数で入力してください"))
				.field("height", positive_length("高さは正の数で入力してください"))
				.field(
					"unit",
					shape::enumeration(["cm", "inch", "m"])
						.message("単位を選択してください")
						.with_default("cm"),
				)
				.optional(),
		)
		.field(
			"weight",
			shape::object()
				.field(
					"value",
					shape::number().positive("重量は正の数で入力してください"),
				)
				.field(
					"unit",
					shape::enumeration(["g", "kg", "lb"])
						.message("重量単位を選択してください")
						.with_default("g"),
				)
				.optional(),
		)
		.field(
			"images",
			shape::array(shape::string().url("有効なURL形式で入力してください"))
				.min(1, "最低1枚の画像が必要です")
				.max(10, "画像は最大10枚まで登録できます"),
		)
		.field(
			"tags",
			shape::array(shape::string().max(20, "タグは20文字以内で入力してください"))
				.max(10, "タグは最大10個まで設定できます")
				.optional(),
		)
		.field("isAvailable", shape::boolean().with_default(true))
		.field("isFeatured", shape::boolean().with_default(false))
		.field("allowBackorder", shape::boolean().with_default(false))
		.field(
			"sku",
			shape::string()
				.regex(
					SKU.clone(),
					"SKUは英大文字、数字、ハイフン、アンダースコアのみ使用できます",
				)
				.max(50, "SKUは50文字以内で入力してください")
				.optional(),
		)
		.field(
			"manufacturerPartNumber",
			shape::string()
				.max(50, "製造元品番は50文字以内で入力してください")
				.optional(),
		)
		.refine(below_list_price())
}

pub fn schema() -> SchemaResult<Schema> {
	Schema::new(registration_shape())
}

pub fn draft_schema() -> SchemaResult<Schema> {
	Schema::new(registration_shape().partial_fields(DRAFT_OPTIONAL_FIELDS)?)
}

pub fn form() -> FormResult<FormKit<ProductRegistration>> {
	create_form(schema()?, "ProductRegistration")
}

/// Which schema a posted payload should be checked against
pub fn schema_for(intent: Option<ListingIntent>) -> SchemaResult<Schema> {
	match intent {
		Some(ListingIntent::Draft) => draft_schema(),
		Some(ListingIntent::Submit) | None => schema(),
	}
}

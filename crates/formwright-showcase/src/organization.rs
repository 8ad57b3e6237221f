//! Organization form: departments, their employees, and clients

use chrono::NaiveDate;
use formwright_forms::{FormKit, FormResult, create_form};
use formwright_schema::shape::{self, ObjectShape, ShapeExt};
use formwright_schema::{Schema, SchemaResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
	Manager,
	Engineer,
	Designer,
	#[serde(rename = "HR")]
	Hr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeContact {
	pub work_phone: String,
	pub personal_phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
	pub name: String,
	pub role: Role,
	pub email: String,
	pub contact: EmployeeContact,
	pub projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
	pub name: String,
	pub employees: Vec<Employee>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
	pub company_name: String,
	pub contact_person: String,
	pub contact_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
	pub country: String,
	pub zip_code: String,
	pub state: String,
	pub city: String,
	pub street: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
	pub organization_name: String,
	pub established_date: NaiveDate,
	pub address: Address,
	pub departments: Vec<Department>,
	pub clients: Option<Vec<Client>>,
}

fn required(message: &'static str) -> shape::StringShape {
	shape::string().type_message(message).min(1, message)
}

pub fn employee_shape() -> ObjectShape {
	shape::object()
		.field("name", required("氏名を入力してください"))
		.field(
			"role",
			shape::enumeration(["Manager", "Engineer", "Designer", "HR"]).message("役割を選択してください"),
		)
		.field(
			"email",
			shape::string()
				.type_message("有効なメールアドレスを入力してください")
				.email("有効なメールアドレスを入力してください"),
		)
		.field(
			"contact",
			shape::object()
				.field(
					"workPhone",
					shape::string()
						.type_message("勤務先電話番号を入力してください")
						.min(10, "勤務先電話番号は10文字以上で入力してください"),
				)
				.field("personalPhone", shape::string().optional()),
		)
		.field(
			"projects",
			shape::array(shape::string()).max(5, "プロジェクトは最大5件まで登録できます"),
		)
}

pub fn department_shape() -> ObjectShape {
	shape::object()
		.field("name", required("部署名を入力してください"))
		.field(
			"employees",
			shape::array(employee_shape()).min(1, "従業員を1人以上登録してください"),
		)
}

fn client_shape() -> ObjectShape {
	shape::object()
		.field("companyName", required("会社名を入力してください"))
		.field("contactPerson", required("担当者名を入力してください"))
		.field(
			"contactEmail",
			shape::string()
				.type_message("有効なメールアドレスを入力してください")
				.email("有効なメールアドレスを入力してください"),
		)
}

pub fn organization_shape() -> ObjectShape {
	shape::object()
		.field("organizationName", required("組織名を入力してください"))
		.field(
			"establishedDate",
			shape::date().type_message("設立日を入力してください"),
		)
		.field(
			"address",
			shape::object()
				.field("country", required("国を入力してください"))
				.field("zipCode", required("郵便番号を入力してください"))
				.field("state", required("都道府県を入力してください"))
				.field("city", required("市区町村を入力してください"))
				.field("street", required("番地を入力してください")),
		)
		.field(
			"departments",
			shape::array(department_shape()).min(1, "部署を1つ以上登録してください"),
		)
		.field("clients", shape::array(client_shape()).optional())
}

pub fn schema() -> SchemaResult<Schema> {
	Schema::new(organization_shape())
}

pub fn form() -> FormResult<FormKit<Organization>> {
	create_form(schema()?, "Organization")
}

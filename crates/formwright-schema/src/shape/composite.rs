//! Lists, unions and deferred shapes

use super::{ObjectShape, Shape};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Homogeneous list
#[derive(Debug, Clone)]
pub struct ArrayShape {
	pub(crate) element: Arc<Shape>,
	pub(crate) min: Option<(usize, String)>,
	pub(crate) max: Option<(usize, String)>,
}

impl ArrayShape {
	pub fn new(element: impl Into<Shape>) -> Self {
		Self {
			element: Arc::new(element.into()),
			min: None,
			max: None,
		}
	}

	pub fn element(&self) -> &Arc<Shape> {
		&self.element
	}

	/// Minimum number of items
	pub fn min(mut self, items: usize, message: impl Into<String>) -> Self {
		self.min = Some((items, message.into()));
		self
	}

	/// Maximum number of items
	pub fn max(mut self, items: usize, message: impl Into<String>) -> Self {
		self.max = Some((items, message.into()));
		self
	}

	pub fn min_items(&self) -> Option<usize> {
		self.min.as_ref().map(|(items, _)| *items)
	}

	pub fn max_items(&self) -> Option<usize> {
		self.max.as_ref().map(|(items, _)| *items)
	}
}

impl From<ArrayShape> for Shape {
	fn from(shape: ArrayShape) -> Self {
		Shape::Array(shape)
	}
}

/// First matching variant wins
#[derive(Debug, Clone)]
pub struct UnionShape {
	pub(crate) variants: Vec<Arc<Shape>>,
}

impl UnionShape {
	pub fn new<I, S>(variants: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Shape>,
	{
		Self {
			variants: variants.into_iter().map(|v| Arc::new(v.into())).collect(),
		}
	}

	pub fn variants(&self) -> &[Arc<Shape>] {
		&self.variants
	}
}

impl From<UnionShape> for Shape {
	fn from(shape: UnionShape) -> Self {
		Shape::Union(shape)
	}
}

/// Union of objects tagged by a shared field.
///
/// Each variant declares the discriminator as an enumeration; its options
/// are the tag values that select the variant.
///
/// # Examples
///
/// ```
/// use formwright_schema::shape;
///
/// let payment = shape::discriminated_union(
///     "method",
///     [
///         shape::object()
///             .field("method", shape::enumeration(["card"]))
///             .field("cardNumber", shape::string().min(12, "Card number is too short")),
///         shape::object()
///             .field("method", shape::enumeration(["transfer"]))
///             .field("iban", shape::string()),
///     ],
/// );
/// assert!(payment.variant_for("transfer").is_some());
/// assert!(payment.variant_for("cash").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct DiscriminatedUnionShape {
	pub(crate) discriminator: String,
	pub(crate) variants: Vec<ObjectShape>,
}

impl DiscriminatedUnionShape {
	pub fn new<I>(discriminator: impl Into<String>, variants: I) -> Self
	where
		I: IntoIterator<Item = ObjectShape>,
	{
		Self {
			discriminator: discriminator.into(),
			variants: variants.into_iter().collect(),
		}
	}

	pub fn discriminator(&self) -> &str {
		&self.discriminator
	}

	pub fn variants(&self) -> &[ObjectShape] {
		&self.variants
	}

	/// Tag values accepted by one variant, empty if it lacks an enum
	/// discriminator
	pub fn tags(&self, variant: &ObjectShape) -> Vec<String> {
		match variant.get(&self.discriminator).map(|shape| shape.unwrapped()) {
			Some(shape) => match shape.as_ref() {
				Shape::Enum(options) => options.options().to_vec(),
				_ => Vec::new(),
			},
			None => Vec::new(),
		}
	}

	pub fn variant_for(&self, tag: &str) -> Option<&ObjectShape> {
		self.variants
			.iter()
			.find(|variant| self.tags(variant).iter().any(|t| t == tag))
	}
}

impl From<DiscriminatedUnionShape> for Shape {
	fn from(shape: DiscriminatedUnionShape) -> Self {
		Shape::DiscriminatedUnion(shape)
	}
}

/// Shape built on first use, for self-referential schemas.
///
/// Clones share the resolved shape.
#[derive(Clone)]
pub struct LazyShape {
	factory: Arc<dyn Fn() -> Shape + Send + Sync>,
	resolved: Arc<OnceLock<Arc<Shape>>>,
}

impl LazyShape {
	pub fn new<F>(factory: F) -> Self
	where
		F: Fn() -> Shape + Send + Sync + 'static,
	{
		Self {
			factory: Arc::new(factory),
			resolved: Arc::new(OnceLock::new()),
		}
	}

	pub fn resolve(&self) -> Arc<Shape> {
		Arc::clone(self.resolved.get_or_init(|| Arc::new((self.factory)())))
	}
}

impl fmt::Debug for LazyShape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LazyShape")
			.field("resolved", &self.resolved.get().is_some())
			.finish()
	}
}

impl From<LazyShape> for Shape {
	fn from(shape: LazyShape) -> Self {
		Shape::Lazy(shape)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::shape;
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[rstest]
	fn test_lazy_resolves_once() {
		static CALLS: AtomicUsize = AtomicUsize::new(0);
		let lazy = LazyShape::new(|| {
			CALLS.fetch_add(1, Ordering::SeqCst);
			shape::string().into()
		});
		let copy = lazy.clone();
		let first = lazy.resolve();
		let second = copy.resolve();
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(CALLS.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	fn test_tags_read_enum_options() {
		let union = DiscriminatedUnionShape::new(
			"kind",
			[
				shape::object().field("kind", shape::enumeration(["a", "b"])),
				shape::object().field("kind", shape::string()),
			],
		);
		assert_eq!(union.tags(&union.variants()[0]), vec!["a", "b"]);
		assert!(union.tags(&union.variants()[1]).is_empty());
		assert!(union.variant_for("b").is_some());
	}

	#[rstest]
	fn test_array_item_bounds() {
		let images = ArrayShape::new(shape::string()).min(1, "one").max(10, "ten");
		assert_eq!(images.min_items(), Some(1));
		assert_eq!(images.max_items(), Some(10));
	}
}

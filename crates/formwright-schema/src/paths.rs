//! Path algebra over shapes
//!
//! ```text
//! object { a: object { b: string, c: [number] }, tags: [string] }
//!
//!   a              a.b             a.c
//!   a.c[number]    tags            tags[number]
//! ```
//!
//! Derivation is depth-bounded: every object member or list element
//! descent consumes one level, so self-referential (`lazy`) shapes
//! terminate. Opaque leaves (strings, numbers, booleans, dates, enums,
//! records) are never descended into.

use crate::path::{FieldPath, PathSegment};
use crate::shape::Shape;
use std::collections::HashSet;
use std::sync::Arc;

/// Default recursion bound of [`derive_paths`]
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Every valid path into `shape`, in declaration order, excluding the root.
///
/// List elements are addressed with the `[number]` placeholder.
///
/// # Examples
///
/// ```
/// use formwright_schema::shape::{self, ShapeExt};
/// use formwright_schema::{derive_paths, DEFAULT_MAX_DEPTH};
/// use std::sync::Arc;
///
/// let shape = Arc::new(
///     shape::object()
///         .field("a", shape::object().field("b", shape::string()).field("c", shape::array(shape::number())))
///         .into_shape(),
/// );
/// let paths: Vec<String> = derive_paths(&shape, DEFAULT_MAX_DEPTH)
///     .iter()
///     .map(ToString::to_string)
///     .collect();
/// assert_eq!(paths, ["a", "a.b", "a.c", "a.c[number]"]);
/// ```
pub fn derive_paths(shape: &Arc<Shape>, max_depth: usize) -> Vec<FieldPath> {
	let mut out = Vec::new();
	let mut seen = HashSet::new();
	collect(shape, &FieldPath::root(), max_depth, &mut out, &mut seen);
	out
}

fn collect(
	shape: &Arc<Shape>,
	prefix: &FieldPath,
	depth_left: usize,
	out: &mut Vec<FieldPath>,
	seen: &mut HashSet<FieldPath>,
) {
	if depth_left == 0 {
		return;
	}
	let shape = shape.unwrapped();
	match shape.as_ref() {
		Shape::Object(object) => {
			for (name, child) in object.fields() {
				let path = prefix.key(name);
				emit(&path, out, seen);
				collect(child, &path, depth_left - 1, out, seen);
			}
		}
		Shape::Array(array) => {
			let path = prefix.any_index();
			emit(&path, out, seen);
			collect(array.element(), &path, depth_left - 1, out, seen);
		}
		Shape::Union(union) => {
			for variant in union.variants() {
				collect(variant, prefix, depth_left, out, seen);
			}
		}
		Shape::DiscriminatedUnion(union) => {
			for variant in union.variants() {
				let variant = Arc::new(Shape::Object(variant.clone()));
				collect(&variant, prefix, depth_left, out, seen);
			}
		}
		_ => {}
	}
}

fn emit(path: &FieldPath, out: &mut Vec<FieldPath>, seen: &mut HashSet<FieldPath>) {
	if seen.insert(path.clone()) {
		out.push(path.clone());
	}
}

/// Shape found at `path`, or `None` when the path does not structurally
/// match (unknown member, indexing a non-list, descending into a leaf).
///
/// Record keys and anything below an untyped value resolve even though
/// [`derive_paths`] never lists them.
///
/// Concrete indices and the `[number]` placeholder both address the list
/// element shape. For unions the first variant that resolves wins.
pub fn resolve_path_type(shape: &Arc<Shape>, path: &FieldPath) -> Option<Arc<Shape>> {
	resolve_segments(shape, path.segments())
}

fn resolve_segments(shape: &Arc<Shape>, segments: &[PathSegment]) -> Option<Arc<Shape>> {
	let Some((head, rest)) = segments.split_first() else {
		return Some(Arc::clone(shape));
	};
	let current = shape.unwrapped();
	match (head, current.as_ref()) {
		(PathSegment::Key(name), Shape::Object(object)) => {
			resolve_segments(object.get(name)?, rest)
		}
		(PathSegment::Index(_) | PathSegment::AnyIndex, Shape::Array(array)) => {
			resolve_segments(array.element(), rest)
		}
		// Maps take any key; untyped values take any remaining segments
		(PathSegment::Key(_), Shape::Record(record)) => resolve_segments(record.value_shape(), rest),
		(_, Shape::Any) => Some(current),
		(_, Shape::Union(union)) => union
			.variants()
			.iter()
			.find_map(|variant| resolve_segments(variant, segments)),
		(PathSegment::Key(name), Shape::DiscriminatedUnion(union)) => union
			.variants()
			.iter()
			.find_map(|variant| resolve_segments(variant.get(name)?, rest)),
		_ => None,
	}
}

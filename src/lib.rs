pub mod errors;
pub mod context;
pub mod path;
pub mod evaluator;
pub mod coerce;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use context::Context;
pub use errors::{EndpointError, ErrorKind, Result};
pub use evaluator::{evaluate, Located, NodeKind};
pub use path::{compile, CompiledPath, Segment};

/// Reusable entry point. Compiled paths are cached in its [`Context`], so
/// looking up the same path repeatedly compiles it once. Cheap to clone and
/// safe to share across threads.
#[derive(Clone, Default)]
pub struct Endpointer {
    ctx: Context,
}

impl Endpointer {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Locate the node at `path` without converting it.
    pub fn locate<'a>(&self, root: &'a Value, path: &str) -> Result<Located<'a>> {
        let compiled = self.ctx.compiled(path)?;
        evaluate(root, &compiled)
    }

    /// Locate the node at `path` and convert it with one of the [`coerce`] functions.
    ///
    /// ```
    /// use json_endpointer::{coerce, Endpointer};
    /// use serde_json::json;
    ///
    /// let doc = json!({"data": [{"timestamp": 1598362949}]});
    /// let ts = Endpointer::default()
    ///     .extract(&doc, "data[0].timestamp", coerce::to_i64)
    ///     .unwrap();
    /// assert_eq!(ts, 1598362949);
    /// ```
    pub fn extract<'a, R>(
        &self,
        root: &'a Value,
        path: &str,
        coerce: impl FnOnce(Located<'a>) -> Result<R>,
    ) -> Result<R> {
        coerce(self.locate(root, path)?)
    }
}

/// Convenience: compile `path` and locate it in `root` in one call.
pub fn locate<'a>(root: &'a Value, path: &str) -> Result<Located<'a>> {
    evaluate(root, &compile(path)?)
}

/// Path lookups straight off a parsed document, one method per target type.
///
/// Every method compiles the path on each call; use [`Endpointer`] when the
/// same paths are read many times.
pub trait JsonEndpoint {
    fn get_key_by_path(&self, path: &str) -> Result<Located<'_>>;

    fn get_key_to_string(&self, path: &str) -> Result<Option<String>> {
        Ok(coerce::to_string(self.get_key_by_path(path)?))
    }

    fn get_key_to_bool(&self, path: &str) -> Result<bool> {
        coerce::to_bool(self.get_key_by_path(path)?)
    }

    fn get_key_to_u8(&self, path: &str) -> Result<u8> {
        coerce::to_u8(self.get_key_by_path(path)?)
    }

    fn get_key_to_i8(&self, path: &str) -> Result<i8> {
        coerce::to_i8(self.get_key_by_path(path)?)
    }

    fn get_key_to_i16(&self, path: &str) -> Result<i16> {
        coerce::to_i16(self.get_key_by_path(path)?)
    }

    fn get_key_to_i32(&self, path: &str) -> Result<i32> {
        coerce::to_i32(self.get_key_by_path(path)?)
    }

    fn get_key_to_i64(&self, path: &str) -> Result<i64> {
        coerce::to_i64(self.get_key_by_path(path)?)
    }

    fn get_key_to_u16(&self, path: &str) -> Result<u16> {
        coerce::to_u16(self.get_key_by_path(path)?)
    }

    fn get_key_to_u32(&self, path: &str) -> Result<u32> {
        coerce::to_u32(self.get_key_by_path(path)?)
    }

    fn get_key_to_u64(&self, path: &str) -> Result<u64> {
        coerce::to_u64(self.get_key_by_path(path)?)
    }

    fn get_key_to_f32(&self, path: &str) -> Result<f32> {
        coerce::to_f32(self.get_key_by_path(path)?)
    }

    fn get_key_to_f64(&self, path: &str) -> Result<f64> {
        coerce::to_f64(self.get_key_by_path(path)?)
    }

    fn get_key_to_decimal(&self, path: &str) -> Result<Decimal> {
        coerce::to_decimal(self.get_key_by_path(path)?)
    }

    fn get_key_to_datetime(&self, path: &str) -> Result<NaiveDateTime> {
        coerce::to_datetime(self.get_key_by_path(path)?)
    }

    fn get_key_to_datetime_offset(&self, path: &str) -> Result<DateTime<FixedOffset>> {
        coerce::to_datetime_offset(self.get_key_by_path(path)?)
    }

    fn get_key_to_array_length(&self, path: &str) -> Result<usize> {
        coerce::to_array_length(self.get_key_by_path(path)?)
    }

    fn get_key_to_object<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        coerce::to_object(self.get_key_by_path(path)?)
    }

    fn get_key_to_array<T: DeserializeOwned>(&self, path: &str) -> Result<Option<Vec<T>>> {
        coerce::to_array(self.get_key_by_path(path)?)
    }
}

impl JsonEndpoint for Value {
    fn get_key_by_path(&self, path: &str) -> Result<Located<'_>> {
        locate(self, path)
    }
}

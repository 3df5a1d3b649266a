//! json-tagged: carry non-JSON values through plain JSON.
//!
//! Two layers:
//!
//! - [`transform_deep`] / [`try_transform_deep`]: a generic depth-first
//!   rewrite of a [`Value`] tree with copy-on-write cloning. Only branches
//!   that actually change are rebuilt; everything else keeps its `Rc`
//!   identity.
//! - [`TypeCodec`]: a tag registry on top of the transformer. Values JSON
//!   cannot represent (arbitrary-precision integers, byte sequences, UTC
//!   timestamps, an undefined marker) become one-key wrapper mappings keyed
//!   by [`TAG_SENTINEL`] plus a short code, and round-trip back losslessly.
//!   Callers extend the registry with their own [`TypeTransformer`]s.
//!
//! ```
//! use std::rc::Rc;
//! use json_tagged::{TypeCodec, Value};
//!
//! let codec = TypeCodec::new();
//! let doc = Rc::new(Value::Arr(vec![Rc::new(Value::bigint(42))]));
//! let text = codec.stringify(&doc).unwrap();
//! assert_eq!(text, "[{\"\u{192}i\":\"42\"}]");
//! assert_eq!(codec.parse(&text).unwrap(), doc);
//! ```

pub mod codec;
pub mod error;
pub mod transform;
pub mod transformer;
pub mod value;

pub use codec::{TypeCodec, TAG_SENTINEL};
pub use error::CodecError;
pub use transform::{transform_deep, try_transform_deep, Visit};
pub use transformer::TypeTransformer;
pub use value::{ExtValue, Value};

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

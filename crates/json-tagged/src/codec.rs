//! The tagged codec: a type registry driving the deep transformer in both
//! directions, plus the wire-text entry points.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::CodecError;
use crate::transform::{transform_deep, try_transform_deep, Visit};
use crate::transformer::{
    BigIntTransformer, BinTransformer, DateTransformer, TypeTransformer, UndefinedTransformer,
};
use crate::value::Value;

/// Sentinel prefixing every tag code on the wire (U+0192). A plain document
/// mapping whose only key starts with this letter is misread as a tag on
/// decode; keep the letter out of ordinary key names.
pub const TAG_SENTINEL: char = 'ƒ';

/// Tag-based codec over [`Value`] trees.
///
/// Owns an ordered registry of [`TypeTransformer`]s, seeded with the four
/// built-ins (`u`, `i`, `b`, `d`). Encoding replaces each special value
/// with a one-key wrapper mapping `{TAG_SENTINEL+code: payload}`; decoding
/// reverses exactly those wrappers and leaves everything else untouched.
/// Unchanged subtrees keep their `Rc` identity through both directions.
pub struct TypeCodec {
    transformers: Vec<Box<dyn TypeTransformer>>,
}

impl TypeCodec {
    pub fn new() -> Self {
        TypeCodec {
            transformers: vec![
                Box::new(UndefinedTransformer),
                Box::new(BigIntTransformer),
                Box::new(BinTransformer),
                Box::new(DateTransformer),
            ],
        }
    }

    /// Appends a transformer to the registry. Entries are consulted in
    /// registration order, so a new entry can never shadow an earlier one.
    /// Fails with [`CodecError::DuplicateTransformer`] when the code is
    /// taken, leaving the registry unchanged.
    pub fn register(&mut self, transformer: Box<dyn TypeTransformer>) -> Result<(), CodecError> {
        if let Some(existing) = self.find_by_code(transformer.code()) {
            return Err(CodecError::DuplicateTransformer {
                code: transformer.code().to_owned(),
                existing: existing.name(),
            });
        }
        self.transformers.push(transformer);
        Ok(())
    }

    fn find_by_code(&self, code: &str) -> Option<&dyn TypeTransformer> {
        self.transformers
            .iter()
            .map(|t| t.as_ref())
            .find(|t| t.code() == code)
    }

    /// Replaces every registered special value in the tree with its tagged
    /// wrapper. Primitives are never tag-checked; subtrees with nothing to
    /// tag come back reference-identical.
    pub fn encode(&self, value: &Rc<Value>) -> Rc<Value> {
        transform_deep(value, &mut |node| {
            if node.is_primitive() {
                return Visit::Proceed;
            }
            match self.transformers.iter().find(|t| t.applies(node)) {
                Some(transformer) => Visit::Replace(Rc::new(wrap(
                    transformer.code(),
                    transformer.encode(node),
                ))),
                None => Visit::Proceed,
            }
        })
    }

    /// Resolves every tagged wrapper in the tree back to its special value.
    /// Fails with [`CodecError::UnknownTransformer`] on a tag code with no
    /// registry entry.
    pub fn decode(&self, value: &Rc<Value>) -> Result<Rc<Value>, CodecError> {
        try_transform_deep(value, &mut |node| {
            let Value::Obj(entries) = node else {
                return Ok(Visit::Proceed);
            };
            if entries.len() != 1 {
                return Ok(Visit::Proceed);
            }
            let Some((key, payload)) = entries.get_index(0) else {
                return Ok(Visit::Proceed);
            };
            let Some(code) = key.strip_prefix(TAG_SENTINEL) else {
                return Ok(Visit::Proceed);
            };
            let transformer = self
                .find_by_code(code)
                .ok_or_else(|| CodecError::UnknownTransformer(code.to_owned()))?;
            Ok(Visit::Replace(Rc::new(transformer.decode(payload)?)))
        })
    }

    /// Encodes `value` and serializes the tagged tree to JSON text.
    ///
    /// The wire JSON library has no per-key serialization hook, so this is
    /// the two-pass route: tagged-tree build, then a plain serialize.
    pub fn stringify(&self, value: &Rc<Value>) -> Result<String, CodecError> {
        let json = self.encode(value).to_json()?;
        Ok(serde_json::to_string(&json)?)
    }

    /// Parses JSON wire text and resolves its tagged wrappers. Syntax
    /// errors from the JSON parser pass through unwrapped.
    pub fn parse(&self, text: &str) -> Result<Rc<Value>, CodecError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        self.decode(&Value::from_json(json))
    }
}

impl Default for TypeCodec {
    fn default() -> Self {
        TypeCodec::new()
    }
}

fn wrap(code: &str, payload: Value) -> Value {
    let mut entries = IndexMap::with_capacity(1);
    entries.insert(format!("{TAG_SENTINEL}{code}"), Rc::new(payload));
    Value::Obj(entries)
}

//! Reference expressions for asset patches.
//!
//! A patch value is either a literal or a reference string wrapped in
//! triple braces. The chain inside reads fields from left to right,
//! separated by `::`. Each link after the first may name:
//!
//! - a field of the previous value,
//! - a component type, when the previous value points at a GameObject or
//!   the chain starts on one (`Transform`, `MonoBehaviour<Alias>`),
//! - a kind name, when the previous value points at a record,
//! - an index (`[1]`), when the previous value is a sequence.
//!
//! Crossing the null reference `{fileID: 0}` yields the caller's default.
//!
//! ```text
//! value: 101
//! value: 'HelloPatch'
//! value: '{{{ GameObject::m_Name }}}'
//! value: '{{{ Transform::m_LocalScale::x }}}'
//! value: '{{{ MonoBehaviour<BoundingBox>::targetObject::Transform::m_LocalScale::x }}}'
//! value: '{{{ MonoBehaviour<SomeComponent>::someVecArray::[1]::y }}}'
//! ```
//!
//! # Example
//!
//! ```
//! use asset_graph::{codec::json::from_json, ObjectId};
//! use asset_ref::{AliasTable, Resolver, ValueExpr};
//! use serde_json::json;
//!
//! let doc = from_json(&json!({
//!     "fileID_1": {"GameObject": {
//!         "m_Name": "Cube",
//!         "m_Component": [{"component": {"fileID": 2}}]
//!     }},
//!     "fileID_2": {"Transform": {
//!         "m_GameObject": {"fileID": 1},
//!         "m_LocalScale": {"x": 2.5, "y": 1, "z": 1}
//!     }}
//! })).unwrap();
//!
//! let aliases = AliasTable::new();
//! let resolver = Resolver::new(&doc, &aliases);
//! let expr = ValueExpr::parse(&json!("{{{ Transform::m_LocalScale::x }}}")).unwrap();
//! let value = resolver.resolve(ObjectId(1), &expr, &json!("")).unwrap();
//! assert_eq!(value, json!(2.5));
//! ```

mod error;
pub use error::ResolveError;

mod types;
pub use types::*;

mod parser;
pub use parser::{strip_markers, ChainParser};

mod resolve;
pub use resolve::Resolver;

mod template;
pub use template::{TemplateIndex, TemplateStore, TEMPLATE_META_SUFFIX};

//! Declarative patches for asset documents.
//!
//! A patch names script types through short aliases and lists actions
//! against components of those types:
//!
//! - `addField`, `deleteField`, `renameField`, `modifyField` edit fields of
//!   every matching scripted component,
//! - `addComponent` attaches a new scripted component to every matching
//!   GameObject,
//! - `deleteComponent` removes scripted components of a type.
//!
//! Field values may be reference expressions, resolved with
//! [`asset_ref::Resolver`] against the document as it was before patching.
//!
//! # Example
//!
//! ```
//! use asset_graph::{codec::json::from_json, ObjectId};
//! use asset_patch::{patches_from_yaml, Patcher};
//! use serde_json::json;
//!
//! let doc = from_json(&json!({
//!     "fileID_1": {"GameObject": {"m_Component": [{"component": {"fileID": 2}}]}},
//!     "fileID_2": {"MonoBehaviour": {
//!         "m_GameObject": {"fileID": 1},
//!         "m_Script": {"fileID": 11500000, "guid": "5f2d", "type": 3}
//!     }}
//! })).unwrap();
//!
//! let patches = patches_from_yaml("
//! components:
//!   Spinner: 5f2d
//! actions:
//!   addField:
//!     - component: Spinner
//!       name: speed
//!       value: 5
//! ").unwrap();
//!
//! let patched = Patcher::new(&patches).patch_document(&doc).unwrap();
//! assert_eq!(patched.get(ObjectId(2)).unwrap().get("speed"), Some(&json!(5)));
//! ```

mod error;
pub use error::PatchError;

mod types;
pub use types::*;

pub mod codec;
pub use codec::json::{from_json, to_json};
pub use codec::yaml::{load_patch_dir, load_patch_file, patches_from_yaml};

mod conditions;
pub use conditions::Guard;

mod apply;
pub use apply::{apply_patch, patch_copy, MONO_BEHAVIOUR_TAG, SCRIPT_ASSET_TYPE, SCRIPT_FILE_ID};

mod patcher;
pub use patcher::{ErrorPolicy, PatchOptions, PatchOutcome, Patcher};

//! Engine field names the patcher reads or writes.

/// Identifier inside a reference value.
pub const FILE_ID: &str = "fileID";
/// Asset guid inside a cross-asset reference value.
pub const GUID: &str = "guid";

/// Owner back-reference on a component body.
pub const GAME_OBJECT: &str = "m_GameObject";
/// Component list on a GameObject body.
pub const COMPONENT: &str = "m_Component";
/// Entry key inside one element of the component list.
pub const COMPONENT_ENTRY: &str = "component";
/// Script-type reference on a MonoBehaviour body.
pub const SCRIPT: &str = "m_Script";

pub const OBJECT_HIDE_FLAGS: &str = "m_ObjectHideFlags";
pub const CORRESPONDING_SOURCE_OBJECT: &str = "m_CorrespondingSourceObject";
pub const PREFAB_INSTANCE: &str = "m_PrefabInstance";
pub const PREFAB_ASSET: &str = "m_PrefabAsset";
pub const ENABLED: &str = "m_Enabled";
pub const EDITOR_HIDE_FLAGS: &str = "m_EditorHideFlags";
pub const NAME: &str = "m_Name";
pub const EDITOR_CLASS_IDENTIFIER: &str = "m_EditorClassIdentifier";

/// Template reference on a PrefabInstance body.
pub const SOURCE_PREFAB: &str = "m_SourcePrefab";

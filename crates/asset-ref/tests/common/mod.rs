#![allow(dead_code)]

use std::path::Path;

use asset_graph::codec::json::from_json;
use asset_graph::{Document, GraphError};
use asset_ref::AliasTable;
use serde_json::json;

pub const FOO: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f90";
pub const BAR: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f0";
pub const DOOR: &str = "d00rd00rd00rd00rd00rd00rd00rd00r";

/// Player (1) with a Transform (2) and two scripted components (3, 4),
/// a Target object (10, 11), and a stripped template instance (20) with one
/// added component (21) backed by PrefabInstance 30.
pub fn scene() -> Document {
    from_json(&json!({
        "fileID_1": {"tag": "!u!1", "stripped": "", "GameObject": {
            "m_Name": "Player",
            "m_Component": [
                {"component": {"fileID": 2}},
                {"component": {"fileID": 3}},
                {"component": {"fileID": 4}}
            ]
        }},
        "fileID_2": {"tag": "!u!4", "stripped": "", "Transform": {
            "m_GameObject": {"fileID": 1},
            "m_LocalScale": {"x": 1, "y": 1, "z": 1}
        }},
        "fileID_3": {"tag": "!u!114", "stripped": "", "MonoBehaviour": {
            "m_GameObject": {"fileID": 1},
            "m_Script": {"fileID": 11500000, "guid": FOO, "type": 3},
            "speed": 4,
            "target": {"fileID": 10},
            "empty": {"fileID": 0},
            "points": [{"x": 0, "y": 1}, {"x": 2, "y": 3}]
        }},
        "fileID_4": {"tag": "!u!114", "stripped": "", "MonoBehaviour": {
            "m_GameObject": {"fileID": 1},
            "m_Script": {"fileID": 11500000, "guid": BAR, "type": 3},
            "speed": 9,
            "target": {"fileID": 0}
        }},
        "fileID_10": {"tag": "!u!1", "stripped": "", "GameObject": {
            "m_Name": "Target",
            "m_Component": [{"component": {"fileID": 11}}]
        }},
        "fileID_11": {"tag": "!u!4", "stripped": "", "Transform": {
            "m_GameObject": {"fileID": 10},
            "m_LocalScale": {"x": 2.5, "y": 1, "z": 1}
        }},
        "fileID_20": {"tag": "!u!1", "stripped": "stripped", "GameObject": {
            "m_CorrespondingSourceObject": {"fileID": 100, "guid": DOOR, "type": 3},
            "m_PrefabInstance": {"fileID": 30},
            "m_PrefabAsset": {"fileID": 0}
        }},
        "fileID_21": {"tag": "!u!114", "stripped": "", "MonoBehaviour": {
            "m_GameObject": {"fileID": 20},
            "m_Script": {"fileID": 11500000, "guid": FOO, "type": 3},
            "speed": 7
        }},
        "fileID_30": {"tag": "!u!1001", "stripped": "", "PrefabInstance": {
            "m_SourcePrefab": {"fileID": 100100000, "guid": DOOR, "type": 3}
        }}
    }))
    .unwrap()
}

pub fn aliases() -> AliasTable {
    [("Foo", FOO), ("Bar", BAR)].into_iter().collect()
}

pub fn door_template() -> Document {
    from_json(&json!({
        "fileID_100": {"tag": "!u!1", "stripped": "", "GameObject": {
            "m_Name": "Door",
            "m_Layer": 5,
            "m_Icon": {"fileID": 7},
            "m_Component": [{"component": {"fileID": 101}}]
        }},
        "fileID_101": {"tag": "!u!4", "stripped": "", "Transform": {
            "m_GameObject": {"fileID": 100}
        }}
    }))
    .unwrap()
}

pub fn load_door(path: &Path) -> Result<Document, GraphError> {
    if path == Path::new("Assets/Door.prefab") {
        Ok(door_template())
    } else {
        Err(GraphError::Decode {
            path: path.to_path_buf(),
            reason: "unknown fixture".to_string(),
        })
    }
}

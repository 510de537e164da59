//! Group data model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Group as represented by the identity backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Server-assigned identifier.
    pub id: Uuid,
    /// Group name, unique among siblings.
    pub name: String,
    /// Slash-separated path from the root group.
    #[serde(default)]
    pub path: String,
    /// Free-form multi-valued attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
    /// Nested child groups.
    #[serde(default)]
    pub sub_groups: Vec<Group>,
}

/// Payload for creating a top-level group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    /// Group name.
    pub name: String,
    /// Free-form multi-valued attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
}

/// Group shape returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    /// Server-assigned identifier.
    pub id: Uuid,
    /// Group name.
    pub name: String,
    /// Slash-separated path from the root group.
    pub path: String,
    /// Free-form multi-valued attributes.
    pub attributes: BTreeMap<String, Vec<String>>,
    /// Nested child groups.
    pub sub_groups: Vec<GroupResponse>,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            path: group.path,
            attributes: group.attributes,
            sub_groups: group.sub_groups.into_iter().map(Self::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_groups_map_recursively() {
        let child_id = Uuid::new_v4();
        let payload = json!({
            "id": Uuid::nil(),
            "name": "staff",
            "path": "/staff",
            "subGroups": [{ "id": child_id, "name": "ops", "path": "/staff/ops" }]
        });

        let group: Group = serde_json::from_value(payload).expect("group decodes");
        let response = GroupResponse::from(group);

        assert_eq!(response.name, "staff");
        assert_eq!(response.sub_groups.len(), 1);
        assert_eq!(
            response.sub_groups.first().map(|child| child.id),
            Some(child_id)
        );
        assert!(response.attributes.is_empty());
    }
}

use serde::Deserialize;

use crate::exclusion::PolicyRef;

/// Body of the policy listing response
#[derive(Debug, Deserialize)]
pub struct PolicyList {
    #[serde(default)]
    pub data: Vec<PolicySummary>,
}

/// One policy descriptor from the listing response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolicySummary {
    pub name: String,
    pub guid: String,
    pub links: PolicyLinks,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolicyLinks {
    /// API resource of the policy; the XML body lives at `<policy>.xml`
    pub policy: String,
}

impl PolicySummary {
    pub fn xml_url(&self) -> String {
        format!("{}.xml", self.links.policy)
    }

    pub fn to_ref(&self) -> PolicyRef {
        PolicyRef::new(&self.name, &self.guid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_listing() {
        let body = r#"{
            "version": "v1.2.0",
            "metadata": {"results": {"total": 2}},
            "data": [
                {
                    "name": "Audit",
                    "guid": "be84e169-0830-4b73-a8b4-3d9c9c8d0cf1",
                    "product": "windows",
                    "default": true,
                    "links": {"policy": "https://api.amp.cisco.com/v1/policies/be84e169-0830-4b73-a8b4-3d9c9c8d0cf1"}
                },
                {
                    "name": "Protect",
                    "guid": "a3c1f5a2-4b0d-4d1e-9c55-0e5cb1b7c2d3",
                    "links": {"policy": "https://api.amp.cisco.com/v1/policies/a3c1f5a2-4b0d-4d1e-9c55-0e5cb1b7c2d3"}
                }
            ]
        }"#;

        let list: PolicyList = serde_json::from_str(body).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].name, "Audit");
        assert_eq!(
            list.data[1].xml_url(),
            "https://api.amp.cisco.com/v1/policies/a3c1f5a2-4b0d-4d1e-9c55-0e5cb1b7c2d3.xml"
        );
        assert_eq!(
            list.data[1].to_ref(),
            PolicyRef::new("Protect", "a3c1f5a2-4b0d-4d1e-9c55-0e5cb1b7c2d3")
        );
    }

    #[test]
    fn deserialize_listing_without_data() {
        let list: PolicyList = serde_json::from_str("{}").unwrap();
        assert!(list.data.is_empty());
    }
}

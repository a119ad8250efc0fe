//! Active alert records, shaped after NWS alert feature properties

use super::lenient::lenient;
use serde::{Deserialize, Serialize};

/// Every field is optional and read on its own; a mistyped field is `None`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertRecord {
    #[serde(deserialize_with = "lenient")]
    pub event: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub area_desc: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub instruction: Option<String>,
}

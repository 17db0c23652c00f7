use serde::{Deserialize, Serialize};

// Current contact details as served to the public site
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub hours: String,
    pub location_image: Option<String>,
}

// Error payload for every non-2xx response
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

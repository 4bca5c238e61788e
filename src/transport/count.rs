use serde::Deserialize;

/// Integer returned by Opilo either as a JSON number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransportCount {
    Int(u64),
    String(String),
}

impl TransportCount {
    pub fn into_u64(self) -> Result<u64, String> {
        match self {
            Self::Int(value) => Ok(value),
            Self::String(value) => value.trim().parse::<u64>().map_err(|_| value),
        }
    }
}

use serde::de::DeserializeOwned;

/// A deserialization failure located inside the document.
#[derive(Debug, Clone)]
pub struct PathError {
    /// Dotted JSON path to the offending node (`families[0].variants`), `.` for the root.
    pub json_path: String,
    pub message: String,
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let json_path = err.path().to_string();
            Err(PathError { json_path, message: err.into_inner().to_string() })
        }
    }
}

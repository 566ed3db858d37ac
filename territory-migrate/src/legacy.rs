//! The legacy flat document: `territorios`, `colors` and `markers`.

use serde_json::{Map, Value};

use crate::core::MigrateError;

/// Legacy document with its top-level sections extracted and type-checked.
///
/// Square marker pools (`markers.A` .. `markers.Z`) are only checked when a
/// square of that letter is actually migrated.
#[derive(Debug, Clone)]
pub struct LegacyDocument {
    territorios: Map<String, Value>,
    colors: Map<String, Value>,
    markers: Map<String, Value>,
    territory_markers: Vec<Value>,
}

impl LegacyDocument {
    pub fn from_value(value: Value) -> Result<Self, MigrateError> {
        let Value::Object(mut root) = value else {
            return Err(MigrateError::WrongType {
                path: "<root>".to_string(),
                expected: "object",
            });
        };

        let territorios = take_object(&mut root, "territorios")?;
        let colors = take_object(&mut root, "colors")?;
        let markers = take_object(&mut root, "markers")?;

        let territory_markers = match markers.get("num") {
            Some(Value::Array(items)) => items.clone(),
            Some(_) => {
                return Err(MigrateError::WrongType {
                    path: "markers.num".to_string(),
                    expected: "array",
                })
            }
            None => return Err(MigrateError::MissingKey("markers.num".to_string())),
        };

        for key in markers.keys() {
            if key != "num" && !is_letter_key(key) {
                tracing::debug!("Ignoring unrecognised marker pool {:?}", key);
            }
        }

        Ok(Self {
            territorios,
            colors,
            markers,
            territory_markers,
        })
    }

    /// Square keys and their edges, in document order.
    pub fn squares(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.territorios.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn square_count(&self) -> usize {
        self.territorios.len()
    }

    pub fn color(&self, territory: u32) -> Option<&Value> {
        self.colors.get(&territory.to_string())
    }

    /// Territory-level markers (`markers.num`), indexed by `territory - 1`.
    pub fn territory_markers(&self) -> &[Value] {
        &self.territory_markers
    }

    /// Marker pool for a square letter.
    pub fn marker_pool(&self, letter: char) -> Result<&[Value], MigrateError> {
        let mut buf = [0u8; 4];
        let key: &str = letter.encode_utf8(&mut buf);
        match self.markers.get(key) {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(MigrateError::WrongType {
                path: format!("markers.{}", letter),
                expected: "array",
            }),
            None => Err(MigrateError::MissingMarkerPool(letter)),
        }
    }
}

fn take_object(root: &mut Map<String, Value>, key: &str) -> Result<Map<String, Value>, MigrateError> {
    match root.remove(key) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(MigrateError::WrongType {
            path: key.to_string(),
            expected: "object",
        }),
        None => Err(MigrateError::MissingKey(key.to_string())),
    }
}

fn is_letter_key(key: &str) -> bool {
    key.len() == 1 && key.bytes().all(|b| b.is_ascii_uppercase())
}

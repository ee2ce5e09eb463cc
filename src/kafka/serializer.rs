use crate::{record::LogRecord, Result};

pub struct JsonSerializer;

impl JsonSerializer {
    pub fn serialize(record: &LogRecord) -> Result<Vec<u8>> {
        serde_json::to_vec(record).map_err(Into::into)
    }
}

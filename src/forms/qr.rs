use thiserror::Error as ThisError;

/// Fields in the pipe-delimited payload printed on national id cards.
pub const FIELD_COUNT: usize = 17;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedId {
    pub national_id: String,
    pub name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ScanError {
    #[error("expected {} fields, got {0}", FIELD_COUNT)]
    FieldCount(usize),
}

pub fn decode(text: &str) -> Result<ScannedId, ScanError> {
    let fields: Vec<&str> = text.split('|').collect();
    if fields.len() != FIELD_COUNT {
        return Err(ScanError::FieldCount(fields.len()));
    }
    Ok(ScannedId {
        national_id: fields[0].to_owned(),
        name: fields[1].to_owned(),
        last_name: fields[2].to_owned(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn payload(fields: usize) -> String {
        let mut parts = vec!["8-123-456".to_owned(), "ANA".to_owned(), "DIAZ".to_owned()];
        parts.extend((3..fields).map(|i| format!("f{}", i)));
        parts.truncate(fields);
        parts.join("|")
    }

    #[test]
    fn test_decode() {
        let scanned = decode(&payload(17)).unwrap();
        assert_eq!(scanned.national_id, "8-123-456");
        assert_eq!(scanned.name, "ANA");
        assert_eq!(scanned.last_name, "DIAZ");
    }

    #[test]
    fn test_wrong_field_count() {
        assert_eq!(decode(&payload(16)), Err(ScanError::FieldCount(16)));
        assert_eq!(decode(&payload(18)), Err(ScanError::FieldCount(18)));
        assert_eq!(decode(""), Err(ScanError::FieldCount(1)));
    }
}

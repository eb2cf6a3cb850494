use std::fmt;

const TAG_INT: u8 = 0;
const TAG_FLOAT: u8 = 1;
const TAG_TEXT: u8 = 2;

/// A single field of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// An ordered collection of field values.
///
/// Records cross the page boundary as length-prefixed bytes: a `u16`
/// field count followed by one tagged value per field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Encodes the record into its byte representation.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(self.values.len() as u16).to_le_bytes());

        for value in &self.values {
            match value {
                Value::Int(v) => {
                    buf.push(TAG_INT);
                    buf.extend_from_slice(&v.to_le_bytes());
                }
                Value::Float(v) => {
                    buf.push(TAG_FLOAT);
                    buf.extend_from_slice(&v.to_le_bytes());
                }
                Value::Text(v) => {
                    buf.push(TAG_TEXT);
                    buf.extend_from_slice(&(v.len() as u16).to_le_bytes());
                    buf.extend_from_slice(v.as_bytes());
                }
            }
        }

        buf
    }

    /// Decodes a record from its byte representation.
    ///
    /// Returns `None` only when `bytes` is truncated. Unrecognized
    /// field tags are read as text and bytes past the last declared
    /// field are ignored.
    pub fn decode(bytes: &[u8]) -> Option<Record> {
        let mut pos = 0;
        let count = read_u16(bytes, &mut pos)?;
        let mut values = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let tag = *bytes.get(pos)?;
            pos += 1;

            let value = match tag {
                TAG_INT => {
                    let raw = take(bytes, &mut pos, 4)?.try_into().ok()?;
                    Value::Int(i32::from_le_bytes(raw))
                }
                TAG_FLOAT => {
                    let raw = take(bytes, &mut pos, 4)?.try_into().ok()?;
                    Value::Float(f32::from_le_bytes(raw))
                }
                _ => {
                    let len = read_u16(bytes, &mut pos)? as usize;
                    let raw = take(bytes, &mut pos, len)?;
                    Value::Text(String::from_utf8_lossy(raw).into_owned())
                }
            };

            values.push(value);
        }

        Some(Record { values })
    }

    /// Returns the record's key: the first field, when it is an integer.
    pub fn primary_key(&self) -> Option<i32> {
        match self.values.first() {
            Some(Value::Int(id)) => Some(*id),
            _ => None,
        }
    }
}

fn read_u16(bytes: &[u8], pos: &mut usize) -> Option<u16> {
    let raw = take(bytes, pos, 2)?.try_into().ok()?;
    Some(u16::from_le_bytes(raw))
}

fn take<'a>(bytes: &'a [u8], pos: &mut usize, len: usize) -> Option<&'a [u8]> {
    let raw = bytes.get(*pos..*pos + len)?;
    *pos += len;
    Some(raw)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_every_value_kind() {
        let record = Record::new(vec![
            Value::Int(7),
            Value::Float(3.5),
            Value::Text("widget".to_string()),
        ]);

        let decoded = Record::decode(&record.encode()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn encodes_to_pinned_byte_layout() {
        let record = Record::new(vec![Value::Int(1), Value::Text("ab".to_string())]);

        assert_eq!(
            record.encode(),
            vec![2, 0, 0, 1, 0, 0, 0, 2, 2, 0, b'a', b'b']
        );
    }

    #[test]
    fn empty_record_is_a_bare_field_count() {
        let record = Record::default();
        let bytes = record.encode();

        assert_eq!(bytes, vec![0, 0]);
        assert_eq!(Record::decode(&bytes).unwrap(), record);
    }

    #[test]
    fn decode_rejects_every_truncation() {
        let bytes = Record::new(vec![
            Value::Int(-4),
            Value::Float(0.25),
            Value::Text("abc".to_string()),
        ])
        .encode();

        for len in 0..bytes.len() {
            assert!(Record::decode(&bytes[..len]).is_none(), "prefix {}", len);
        }
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let record = Record::new(vec![Value::Int(9)]);
        let mut bytes = record.encode();
        bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF]);

        assert_eq!(Record::decode(&bytes).unwrap(), record);
    }

    #[test]
    fn unrecognized_tag_reads_as_text() {
        let bytes = vec![1, 0, 9, 3, 0, b'a', b'b', b'c'];

        let decoded = Record::decode(&bytes).unwrap();
        assert_eq!(decoded.values, vec![Value::Text("abc".to_string())]);
    }

    #[test]
    fn primary_key_requires_a_leading_integer() {
        let keyed = Record::new(vec![Value::Int(42), Value::Text("x".to_string())]);
        let unkeyed = Record::new(vec![Value::Text("x".to_string())]);

        assert_eq!(keyed.primary_key(), Some(42));
        assert_eq!(unkeyed.primary_key(), None);
        assert_eq!(Record::default().primary_key(), None);
    }

    #[test]
    fn values_display_plainly() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Text("name".to_string()).to_string(), "name");
    }
}

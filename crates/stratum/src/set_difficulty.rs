use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct SetDifficulty(pub BigRational);

impl Serialize for SetDifficulty {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(1))?;
        seq.serialize_element(&DifficultyWire(&self.0))?;
        seq.end()
    }
}

struct DifficultyWire<'a>(&'a BigRational);

impl Serialize for DifficultyWire<'_> {
    fn serialize<S: Serializer>(&self, ser: S) -> std::result::Result<S::Ok, S::Error> {
        difficulty::serialize_rational(self.0, ser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_single_element_array() {
        let set_diff = SetDifficulty(BigRational::from_integer(4u32.into()));
        let value = serde_json::to_value(&set_diff).unwrap();
        assert_eq!(value, serde_json::json!([4]));
    }
}

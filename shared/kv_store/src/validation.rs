//! Key and value checks performed before any call to the storage client

use std::fmt::Display;

use serde::ser::{self, Impossible, Serialize, Serializer};
use thiserror::Error;

/// Rejected operation input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The key is an empty string
    #[error("The key must not be empty")]
    EmptyKey,

    /// The value has no content to store (`None`, `()` or a unit struct)
    #[error("The value must not be nil")]
    NilValue,
}

/// Checks that a key can be stored
///
/// # Errors
///
/// Returns `ValidationError::EmptyKey` if `key` is empty
pub const fn check_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey);
    }
    Ok(())
}

/// Checks that a value is not nil
///
/// Only the top level of the value is inspected, so the check stops at the
/// first serializer call. Anything other than nil is left to the codec.
///
/// # Errors
///
/// Returns `ValidationError::NilValue` if `value` serializes as `None`, `()`
/// or a unit struct
pub fn check_value<T: Serialize + ?Sized>(value: &T) -> Result<(), ValidationError> {
    match value.serialize(NilCheck) {
        Ok(()) => Err(ValidationError::NilValue),
        Err(Present) => Ok(()),
    }
}

/// Checks both the key and the value of a write
///
/// # Errors
///
/// Returns the first `ValidationError` found, key first
pub fn check_key_and_value<T: Serialize + ?Sized>(
    key: &str,
    value: &T,
) -> Result<(), ValidationError> {
    check_key(key)?;
    check_value(value)
}

/// Stops serialization at the first call that carries content
#[derive(Error, Debug)]
#[error("value is present")]
struct Present;

impl ser::Error for Present {
    fn custom<T: Display>(_msg: T) -> Self {
        Self
    }
}

/// Serializer that succeeds only for nil values
struct NilCheck;

macro_rules! present {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Result<(), Present> {
                Err(Present)
            }
        )*
    };
}

impl Serializer for NilCheck {
    type Ok = ();
    type Error = Present;
    type SerializeSeq = Impossible<(), Present>;
    type SerializeTuple = Impossible<(), Present>;
    type SerializeTupleStruct = Impossible<(), Present>;
    type SerializeTupleVariant = Impossible<(), Present>;
    type SerializeMap = Impossible<(), Present>;
    type SerializeStruct = Impossible<(), Present>;
    type SerializeStructVariant = Impossible<(), Present>;

    present! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
    }

    fn serialize_none(self) -> Result<(), Present> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<(), Present> {
        Err(Present)
    }

    fn serialize_unit(self) -> Result<(), Present> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), Present> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<(), Present> {
        Err(Present)
    }

    // Transparent wrappers are nil when their content is
    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), Present> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<(), Present> {
        Err(Present)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Present> {
        Err(Present)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Present> {
        Err(Present)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Present> {
        Err(Present)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Present> {
        Err(Present)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Present> {
        Err(Present)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Present> {
        Err(Present)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Present> {
        Err(Present)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Marker;

    #[derive(Serialize)]
    struct Foo {
        bar: String,
    }

    #[test]
    fn test_empty_key_is_rejected() {
        assert_eq!(check_key(""), Err(ValidationError::EmptyKey));
        assert_eq!(check_key(" "), Ok(()));
        assert_eq!(check_key("user:42"), Ok(()));
    }

    #[test]
    fn test_nil_values_are_rejected() {
        assert_eq!(check_value(&None::<String>), Err(ValidationError::NilValue));
        assert_eq!(check_value(&()), Err(ValidationError::NilValue));
        assert_eq!(check_value(&Marker), Err(ValidationError::NilValue));
    }

    #[test]
    fn test_empty_but_present_values_are_accepted() {
        assert_eq!(check_value(""), Ok(()));
        assert_eq!(check_value(&0), Ok(()));
        assert_eq!(check_value(&Vec::<u8>::new()), Ok(()));
        assert_eq!(check_value(&Some("x")), Ok(()));
        assert_eq!(
            check_value(&Foo {
                bar: "baz".to_string()
            }),
            Ok(())
        );
    }

    #[test]
    fn test_non_finite_floats_are_values() {
        assert_eq!(check_value(&f64::NAN), Ok(()));
        assert_eq!(check_value(&f32::INFINITY), Ok(()));
        assert_eq!(check_value(&vec![f64::NEG_INFINITY]), Ok(()));
    }

    #[test]
    fn test_newtype_wrappers_follow_their_content() {
        #[derive(Serialize)]
        struct Wrapper<T>(T);

        assert_eq!(check_value(&Wrapper(None::<u8>)), Err(ValidationError::NilValue));
        assert_eq!(check_value(&Wrapper(1u8)), Ok(()));
    }

    #[test]
    fn test_values_without_json_form_are_left_to_the_codec() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON object keys");

        assert_eq!(check_value(&map), Ok(()));
    }

    #[test]
    fn test_key_is_checked_before_value() {
        assert_eq!(
            check_key_and_value("", &None::<u8>),
            Err(ValidationError::EmptyKey)
        );
        assert_eq!(
            check_key_and_value("k", &None::<u8>),
            Err(ValidationError::NilValue)
        );
    }
}

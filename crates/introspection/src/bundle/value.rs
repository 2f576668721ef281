use std::collections::{BTreeMap, HashMap};

/// A value stored in a bundle's info dictionary.
///
/// This is the closed set of property list types: scalars, dates, blobs, and nested arrays and dictionaries of the same.
#[derive(Debug, Clone, PartialEq)]
pub enum BundleValue {
    Boolean(bool),
    /// Any integer width; narrower widths are range-checked when read back out.
    Integer(i128),
    Real(f64),
    String(String),
    Date(chrono::DateTime<chrono::Utc>),
    Data(Box<[u8]>),
    Array(Vec<BundleValue>),
    Dictionary(BTreeMap<String, BundleValue>),
}

impl BundleValue {
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(string) = self { Some(string) } else { None }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Boolean(boolean) = self { Some(*boolean) } else { None }
    }

    pub fn as_array(&self) -> Option<&[BundleValue]> {
        if let Self::Array(array) = self { Some(array) } else { None }
    }

    pub fn as_dictionary(&self) -> Option<&BTreeMap<String, BundleValue>> {
        if let Self::Dictionary(dictionary) = self { Some(dictionary) } else { None }
    }

    /// The name of this value's property list type.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Data(_) => "data",
            Self::Array(_) => "array",
            Self::Dictionary(_) => "dictionary",
        }
    }
}

impl core::fmt::Display for BundleValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Boolean(boolean) => write!(f, "{boolean}"),
            Self::Integer(integer) => write!(f, "{integer}"),
            Self::Real(real) => write!(f, "{real}"),
            Self::String(string) => f.write_str(string),
            Self::Date(date) => write!(f, "{}", date.to_rfc3339()),
            Self::Data(data) => write!(f, "<{} bytes>", data.len()),
            Self::Array(array) => {
                f.write_str("[")?;
                for (i, value) in array.iter().enumerate() {
                    if i != 0 { f.write_str(", ")?; }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Self::Dictionary(dictionary) => {
                f.write_str("{")?;
                for (i, (key, value)) in dictionary.iter().enumerate() {
                    if i != 0 { f.write_str(", ")?; }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Dates serialize as RFC 3339 strings; data serializes as bytes.
#[cfg(feature = "serde")]
impl serde::Serialize for BundleValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Boolean(boolean) => serializer.serialize_bool(*boolean),
            Self::Integer(integer) => {
                if let Ok(integer) = i64::try_from(*integer) {
                    serializer.serialize_i64(integer)
                } else if let Ok(integer) = u64::try_from(*integer) {
                    serializer.serialize_u64(integer)
                } else {
                    serializer.serialize_i128(*integer)
                }
            }
            Self::Real(real) => serializer.serialize_f64(*real),
            Self::String(string) => serializer.serialize_str(string),
            Self::Date(date) => serializer.serialize_str(&date.to_rfc3339()),
            Self::Data(data) => serializer.serialize_bytes(data),
            Self::Array(array) => serializer.collect_seq(array),
            Self::Dictionary(dictionary) => serializer.collect_map(dictionary),
        }
    }
}

/// A type that can be read out of a [`BundleValue`].
///
/// Reading is a cast: a value of any other variant (or an integer out of range) reads as `None`.
pub trait FromBundleValue: Sized {
    fn from_bundle_value(value: &BundleValue) -> Option<Self>;
}

impl FromBundleValue for BundleValue {
    fn from_bundle_value(value: &BundleValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromBundleValue for bool {
    fn from_bundle_value(value: &BundleValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromBundleValue for String {
    fn from_bundle_value(value: &BundleValue) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromBundleValue for f64 {
    fn from_bundle_value(value: &BundleValue) -> Option<Self> {
        if let BundleValue::Real(real) = value { Some(*real) } else { None }
    }
}

impl FromBundleValue for f32 {
    fn from_bundle_value(value: &BundleValue) -> Option<Self> {
        f64::from_bundle_value(value).map(|real| real as f32)
    }
}

impl FromBundleValue for chrono::DateTime<chrono::Utc> {
    fn from_bundle_value(value: &BundleValue) -> Option<Self> {
        if let BundleValue::Date(date) = value { Some(*date) } else { None }
    }
}

impl FromBundleValue for Box<[u8]> {
    fn from_bundle_value(value: &BundleValue) -> Option<Self> {
        if let BundleValue::Data(data) = value { Some(data.clone()) } else { None }
    }
}

macro_rules! impl_from_bundle_value_for_integers {
    ($($ty: ty),*) => {
        $(
            impl FromBundleValue for $ty {
                fn from_bundle_value(value: &BundleValue) -> Option<Self> {
                    if let BundleValue::Integer(integer) = value {
                        <$ty>::try_from(*integer).ok()
                    } else { None }
                }
            }
        )*
    }
}

impl_from_bundle_value_for_integers!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl<T: FromBundleValue> FromBundleValue for Vec<T> {
    fn from_bundle_value(value: &BundleValue) -> Option<Self> {
        value.as_array()?.iter().map(T::from_bundle_value).collect()
    }
}

impl<T: FromBundleValue> FromBundleValue for BTreeMap<String, T> {
    fn from_bundle_value(value: &BundleValue) -> Option<Self> {
        value.as_dictionary()?.iter()
            .map(|(key, value)| Some((key.clone(), T::from_bundle_value(value)?)))
            .collect()
    }
}

impl<T: FromBundleValue> FromBundleValue for HashMap<String, T> {
    fn from_bundle_value(value: &BundleValue) -> Option<Self> {
        value.as_dictionary()?.iter()
            .map(|(key, value)| Some((key.clone(), T::from_bundle_value(value)?)))
            .collect()
    }
}

macro_rules! impl_from_for_bundle_value {
    ($($ty: ty => $variant: ident),*) => {
        $(
            impl From<$ty> for BundleValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    }
}

impl_from_for_bundle_value!(
    bool => Boolean,
    u8 => Integer, u16 => Integer, u32 => Integer, u64 => Integer,
    i8 => Integer, i16 => Integer, i32 => Integer, i64 => Integer, i128 => Integer,
    f32 => Real, f64 => Real,
    String => String, &str => String,
    chrono::DateTime<chrono::Utc> => Date,
    Vec<u8> => Data, &[u8] => Data,
    Vec<BundleValue> => Array,
    BTreeMap<String, BundleValue> => Dictionary
);

#[cfg(feature = "json")]
impl BundleValue {
    /// Converts a JSON value, as produced by `plutil -convert json`.
    /// `null` has no property list counterpart and converts to `None`; inside arrays and objects it is skipped.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        use serde_json::Value;
        Some(match value {
            Value::Null => return None,
            Value::Bool(boolean) => Self::Boolean(boolean),
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    Self::Integer(integer.into())
                } else if let Some(integer) = number.as_u64() {
                    Self::Integer(integer.into())
                } else {
                    Self::Real(number.as_f64()?)
                }
            }
            Value::String(string) => Self::String(string),
            Value::Array(array) => Self::Array(array.into_iter().filter_map(Self::from_json).collect()),
            Value::Object(object) => Self::Dictionary(object.into_iter()
                .filter_map(|(key, value)| Some((key, Self::from_json(value)?)))
                .collect()),
        })
    }
}

#[cfg(feature = "toml")]
impl From<toml::Value> for BundleValue {
    fn from(value: toml::Value) -> Self {
        use toml::Value;
        match value {
            Value::Boolean(boolean) => Self::Boolean(boolean),
            Value::Integer(integer) => Self::Integer(integer.into()),
            Value::Float(float) => Self::Real(float),
            Value::String(string) => Self::String(string),
            Value::Datetime(datetime) => {
                let rendered = datetime.to_string();
                parse_date(&rendered).map(Self::Date).unwrap_or(Self::String(rendered))
            }
            Value::Array(array) => Self::Array(array.into_iter().map(Self::from).collect()),
            Value::Table(table) => Self::Dictionary(table.into_iter().map(|(key, value)| (key, Self::from(value))).collect()),
        }
    }
}

/// Offset date-times keep their offset; local date-times and dates are taken as UTC.
#[cfg(feature = "toml")]
fn parse_date(rendered: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    if let Ok(date) = DateTime::parse_from_rfc3339(rendered) {
        return Some(date.with_timezone(&Utc))
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(rendered, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date.and_utc())
    }
    NaiveDate::parse_from_str(rendered, "%Y-%m-%d").ok()?
        .and_hms_opt(0, 0, 0)
        .map(|date| date.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_widths() {
        let small = BundleValue::from(200u8);
        assert_eq!(u8::from_bundle_value(&small), Some(200));
        assert_eq!(i8::from_bundle_value(&small), None, "out of range reads as absent");
        assert_eq!(u64::from_bundle_value(&small), Some(200));

        let negative = BundleValue::from(-1i32);
        assert_eq!(u32::from_bundle_value(&negative), None);
        assert_eq!(i64::from_bundle_value(&negative), Some(-1));

        let huge = BundleValue::from(u64::MAX);
        assert_eq!(u64::from_bundle_value(&huge), Some(u64::MAX));
        assert_eq!(i64::from_bundle_value(&huge), None);
    }

    #[test]
    fn variant_mismatch() {
        let string = BundleValue::from("1.2.3");
        assert_eq!(String::from_bundle_value(&string).as_deref(), Some("1.2.3"));
        assert_eq!(bool::from_bundle_value(&string), None);
        assert_eq!(u32::from_bundle_value(&string), None);
        assert_eq!(f64::from_bundle_value(&BundleValue::from(3)), None, "integers are not reals");
        assert_eq!(Box::<[u8]>::from_bundle_value(&BundleValue::from(vec![1u8, 2, 3])).as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn containers() {
        let array = BundleValue::Array(vec!["en".into(), "fr".into()]);
        assert_eq!(Vec::<String>::from_bundle_value(&array), Some(vec!["en".to_owned(), "fr".to_owned()]));

        let mixed = BundleValue::Array(vec!["en".into(), 3.into()]);
        assert_eq!(Vec::<String>::from_bundle_value(&mixed), None, "one mismatched element spoils the whole array");
        assert_eq!(Vec::<BundleValue>::from_bundle_value(&mixed).map(|values| values.len()), Some(2));

        let dictionary = BundleValue::Dictionary(BTreeMap::from([
            ("LSMinimumSystemVersion".to_owned(), "10.15".into()),
            ("NSHumanReadableCopyright".to_owned(), "Copyright".into()),
        ]));
        let read = HashMap::<String, String>::from_bundle_value(&dictionary).expect("all values are strings");
        assert_eq!(read.get("LSMinimumSystemVersion").map(String::as_str), Some("10.15"));
        assert_eq!(BTreeMap::<String, bool>::from_bundle_value(&dictionary), None);
    }

    #[test]
    fn display() {
        let value = BundleValue::Dictionary(BTreeMap::from([
            ("a".to_owned(), BundleValue::Array(vec![true.into(), 1.5.into()])),
            ("b".to_owned(), BundleValue::from(vec![0u8; 4])),
        ]));
        assert_eq!(value.to_string(), "{a: [true, 1.5], b: <4 bytes>}");
    }

    #[cfg(feature = "json")]
    #[test]
    fn from_json() {
        let json = serde_json::json!({
            "CFBundleName": "Finder",
            "LSRequiresNativeExecution": true,
            "Count": 3,
            "Big": 18446744073709551615u64,
            "Scale": 2.5,
            "Nothing": null,
            "List": [1, null, "two"],
        });
        let BundleValue::Dictionary(dictionary) = BundleValue::from_json(json).unwrap() else { panic!("expected a dictionary") };
        assert_eq!(dictionary.get("CFBundleName"), Some(&BundleValue::from("Finder")));
        assert_eq!(dictionary.get("Count"), Some(&BundleValue::Integer(3)));
        assert_eq!(dictionary.get("Big"), Some(&BundleValue::Integer(u64::MAX.into())));
        assert_eq!(dictionary.get("Scale"), Some(&BundleValue::Real(2.5)));
        assert!(!dictionary.contains_key("Nothing"));
        assert_eq!(dictionary.get("List").and_then(BundleValue::as_array).map(<[_]>::len), Some(2));
    }

    #[cfg(all(feature = "serde", feature = "json"))]
    #[test]
    fn serialize() {
        let value = BundleValue::Dictionary(BTreeMap::from([
            ("Big".to_owned(), BundleValue::from(u64::MAX)),
            ("Flags".to_owned(), BundleValue::Array(vec![true.into(), (-4).into()])),
            ("Data".to_owned(), BundleValue::from(&b"\x01\x02"[..])),
        ]));
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"Big":18446744073709551615,"Data":[1,2],"Flags":[true,-4]}"#);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn from_toml() {
        let table: toml::Value = toml::from_str(r#"
            Released = 2021-07-24T10:00:00Z
            Local = 2021-07-24T10:00:00
            Day = 2021-07-24
            Hour = 10:00:00
        "#).unwrap();
        let BundleValue::Dictionary(dictionary) = BundleValue::from(table) else { panic!("expected a dictionary") };
        let date = |key: &str| dictionary.get(key).and_then(chrono::DateTime::<chrono::Utc>::from_bundle_value);
        assert_eq!(date("Released").map(|date| date.to_rfc3339()).as_deref(), Some("2021-07-24T10:00:00+00:00"));
        assert_eq!(date("Local"), date("Released"));
        assert!(date("Day").is_some());
        assert_eq!(dictionary.get("Hour"), Some(&BundleValue::from("10:00:00")), "a bare time is not a date");
    }
}

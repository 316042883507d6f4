//! 레코드 모델 및 평탄화 모듈
//!
//! 입력 JSON 문서의 레코드 구조와, 중첩 레코드를 고정 순서의 CSV 행으로
//! 펼치는 규칙을 정의합니다.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::JCsvError;

/// `null` 값을 기본값으로 취급하는 역직렬화 헬퍼
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 객체 키를 모두 소문자로 바꿈 (중첩 객체/배열 포함)
///
/// 같은 키가 대소문자만 달리 여러 번 나오면 마지막 값이 남습니다.
pub fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), fold_keys(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(arr) => Value::Array(arr.into_iter().map(fold_keys).collect()),
        other => other,
    }
}

/// 입력 JSON 문서 (`{"Items": [...]}`)
///
/// 키는 대소문자를 구분하지 않습니다 (`ITEMS`, `First_Name` 등도 인정).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// 문서에 담긴 레코드 목록
    pub items: Vec<Record>,
}

#[derive(Deserialize)]
struct FoldedDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    items: Vec<Record>,
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = fold_keys(Value::deserialize(deserializer)?);
        let folded: FoldedDocument = serde_json::from_value(value).map_err(D::Error::custom)?;
        Ok(Document {
            items: folded.items,
        })
    }
}

/// 입력 레코드 하나
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact: Contact,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pet: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub car: String,
}

/// 연락처 블록
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Contact {
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timezone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: Address,
}

/// 주소 블록
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Address {
    #[serde(default, deserialize_with = "null_as_default")]
    pub street_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_code: String,
}

/// CSV 출력 컬럼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    FirstName,
    LastName,
    Email,
    Timezone,
    StreetName,
    City,
    Country,
    CountryCode,
    Pet,
    Car,
}

impl Column {
    /// 기본 출력 순서의 전체 컬럼
    pub const ALL: [Column; 11] = [
        Column::Id,
        Column::FirstName,
        Column::LastName,
        Column::Email,
        Column::Timezone,
        Column::StreetName,
        Column::City,
        Column::Country,
        Column::CountryCode,
        Column::Pet,
        Column::Car,
    ];

    /// 헤더 및 `--columns` 에서 쓰이는 컬럼 이름
    pub fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::FirstName => "first_name",
            Column::LastName => "last_name",
            Column::Email => "email",
            Column::Timezone => "timezone",
            Column::StreetName => "street_name",
            Column::City => "city",
            Column::Country => "country",
            Column::CountryCode => "country_code",
            Column::Pet => "pet",
            Column::Car => "car",
        }
    }

    /// 레코드에서 이 컬럼에 해당하는 값을 꺼냄
    pub fn extract(self, record: &Record) -> &str {
        let address = &record.contact.address;
        match self {
            Column::Id => &record.id,
            Column::FirstName => &record.first_name,
            Column::LastName => &record.last_name,
            Column::Email => &record.contact.email,
            Column::Timezone => &record.contact.timezone,
            Column::StreetName => &address.street_name,
            Column::City => &address.city,
            Column::Country => &address.country,
            Column::CountryCode => &address.country_code,
            Column::Pet => &record.pet,
            Column::Car => &record.car,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = JCsvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| JCsvError::InvalidColumn {
                name: name.to_string(),
            })
    }
}

/// 평탄화된 CSV 행
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub fields: Vec<String>,
}

impl Record {
    /// 레코드를 주어진 컬럼 순서대로 평탄화
    ///
    /// 비어 있거나 누락된 값은 빈 문자열이 됩니다.
    pub fn flatten(&self, columns: &[Column]) -> Row {
        Row {
            fields: columns
                .iter()
                .map(|c| c.extract(self).to_string())
                .collect(),
        }
    }
}

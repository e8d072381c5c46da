//! Closed value sets stored on student records.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Element a student channels. Stored and serialized by display value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagicAffinity {
    #[serde(rename = "Oscuridad")]
    Darkness,
    #[default]
    #[serde(rename = "Luz")]
    Light,
    #[serde(rename = "Fuego")]
    Fire,
    #[serde(rename = "Agua")]
    Water,
    #[serde(rename = "Viento")]
    Wind,
    #[serde(rename = "Tierra")]
    Earth,
}

impl MagicAffinity {
    pub const ALL: [Self; 6] = [
        Self::Darkness,
        Self::Light,
        Self::Fire,
        Self::Water,
        Self::Wind,
        Self::Earth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Darkness => "Oscuridad",
            Self::Light => "Luz",
            Self::Fire => "Fuego",
            Self::Water => "Agua",
            Self::Wind => "Viento",
            Self::Earth => "Tierra",
        }
    }

    /// Parses a stored value. Accepts the display value only.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == value)
    }
}

/// Grimoire cover assigned to a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grimoire {
    #[serde(rename = "Sinceridad")]
    Sincerity,
    #[serde(rename = "Esperanza")]
    Hope,
    #[serde(rename = "Amor")]
    Love,
    #[serde(rename = "Buena Fortuna")]
    GoodFortune,
    #[serde(rename = "Desesperación")]
    Desperation,
}

impl Grimoire {
    pub const ALL: [Self; 5] = [
        Self::Sincerity,
        Self::Hope,
        Self::Love,
        Self::GoodFortune,
        Self::Desperation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sincerity => "Sinceridad",
            Self::Hope => "Esperanza",
            Self::Love => "Amor",
            Self::GoodFortune => "Buena Fortuna",
            Self::Desperation => "Desesperación",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == value)
    }
}

macro_rules! impl_text_column {
    ($ty:ty, $column:literal) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;
                Self::parse(text).ok_or_else(|| {
                    FromSqlError::Other(
                        format!("invalid {} value `{text}`", $column).into(),
                    )
                })
            }
        }
    };
}

impl_text_column!(MagicAffinity, "magic_affinity");
impl_text_column!(Grimoire, "grimoire_cover");

#[cfg(test)]
mod tests {
    use super::{Grimoire, MagicAffinity};

    #[test]
    fn parse_accepts_stored_values_only() {
        assert_eq!(MagicAffinity::parse("Fuego"), Some(MagicAffinity::Fire));
        assert_eq!(MagicAffinity::parse("Fire"), None);
        assert_eq!(
            Grimoire::parse("Buena Fortuna"),
            Some(Grimoire::GoodFortune)
        );
        assert_eq!(Grimoire::parse("buena fortuna"), None);
    }

    #[test]
    fn default_affinity_is_light() {
        assert_eq!(MagicAffinity::default(), MagicAffinity::Light);
    }

    #[test]
    fn serde_uses_stored_values() {
        let json = serde_json::to_string(&Grimoire::Desperation).unwrap();
        assert_eq!(json, "\"Desesperación\"");
        let decoded: MagicAffinity = serde_json::from_str("\"Viento\"").unwrap();
        assert_eq!(decoded, MagicAffinity::Wind);
    }
}

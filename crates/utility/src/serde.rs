/// Optional text fields where a blank string means "not given".
pub mod blank_as_none {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.filter(|s| !s.trim().is_empty()))
    }
}

/// Optional query parameters (`?latitude=`) that may be present but empty.
pub mod empty_as_none {
    use std::{fmt::Display, str::FromStr};

    use serde::{de::Error, Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.trim().is_empty() => {
                s.trim().parse::<T>().map(Some).map_err(D::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

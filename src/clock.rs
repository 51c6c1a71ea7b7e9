use chrono::{Local, NaiveDate, Utc};
use serde_with::DeserializeFromStr;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// Source of the real-world current date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Clone, Debug, PartialEq, Eq, DeserializeFromStr)]
pub enum Timezone {
    Local,
    Iana(chrono_tz::Tz),
}

impl Default for Timezone {
    fn default() -> Self {
        Timezone::Local
    }
}

impl FromStr for Timezone {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowercase = s.to_lowercase();

        if matches!(lowercase.as_str(), "localtime" | "local") {
            Ok(Timezone::Local)
        } else if let Ok(tz) = s.parse::<chrono_tz::Tz>() {
            Ok(Timezone::Iana(tz))
        } else {
            Err(Error::new(
                ErrorKind::TimezoneParse,
                &format!("Timezone '{}' not recognized", s),
            ))
        }
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Local => write!(f, "local"),
            Timezone::Iana(tz) => write!(f, "{}", tz.name()),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SystemClock {
    tz: Timezone,
}

impl SystemClock {
    pub fn new(tz: Timezone) -> Self {
        SystemClock { tz }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match &self.tz {
            Timezone::Local => Local::now().date_naive(),
            Timezone::Iana(tz) => Utc::now().with_timezone(tz).date_naive(),
        }
    }
}

/// Clock pinned to a single date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

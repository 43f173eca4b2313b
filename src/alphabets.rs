use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    EnumIter,
    EnumString,
    Display,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum KnownAlphabet {
    // Upper-case letters with '_' as the word separator.
    #[default]
    UpperUnderscore,
    UpperSpace,
    LowerSpace,
    Upper,
}

impl KnownAlphabet {
    pub fn symbols(&self) -> &'static str {
        match self {
            Self::UpperUnderscore => "ABCDEFGHIJKLMNOPQRSTUVWXYZ_",
            Self::UpperSpace => "ABCDEFGHIJKLMNOPQRSTUVWXYZ ",
            Self::LowerSpace => "abcdefghijklmnopqrstuvwxyz ",
            Self::Upper => "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
        }
    }
}

pub fn get_all_alphabets() -> Vec<(KnownAlphabet, &'static str)> {
    KnownAlphabet::iter().map(|a| (a, a.symbols())).collect()
}

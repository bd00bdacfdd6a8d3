use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Countries the phone field can be entered for.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Country {
    #[default]
    US,
    CA,
    BR,
    PT,
    GB,
}

/// How a phone number is entered and displayed for one country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhoneFormat {
    pub dial_code: &'static str,
    pub max_digits: usize,
    /// `#` consumes one digit, every other character is emitted verbatim.
    pub mask: &'static str,
    pub placeholder: &'static str,
}

const NANP: PhoneFormat = PhoneFormat {
    dial_code: "+1",
    max_digits: 10,
    mask: "(###) ###-####",
    placeholder: "(555) 123-4567",
};

const BRAZIL: PhoneFormat = PhoneFormat {
    dial_code: "+55",
    max_digits: 11,
    mask: "(##) #####-####",
    placeholder: "(11) 99999-9999",
};

const PORTUGAL: PhoneFormat = PhoneFormat {
    dial_code: "+351",
    max_digits: 9,
    mask: "### ### ###",
    placeholder: "912 345 678",
};

const UNITED_KINGDOM: PhoneFormat = PhoneFormat {
    dial_code: "+44",
    max_digits: 10,
    mask: "#### ######",
    placeholder: "7400 123456",
};

impl Country {
    pub fn phone_format(self) -> &'static PhoneFormat {
        match self {
            Country::US | Country::CA => &NANP,
            Country::BR => &BRAZIL,
            Country::PT => &PORTUGAL,
            Country::GB => &UNITED_KINGDOM,
        }
    }

    pub fn max_digits(self) -> usize {
        self.phone_format().max_digits
    }

    pub fn dial_code(self) -> &'static str {
        self.phone_format().dial_code
    }

    pub fn label_key(self) -> String {
        format!("countries.{}", self.as_ref().to_lowercase())
    }
}

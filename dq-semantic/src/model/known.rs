//! Canonical ordering of well-known categories.
//!
//! When two categories have the same count, the one listed first here ranks
//! first. Specific categories precede their generic parents so that a tie
//! between `US_PHONE` and `PHONE` resolves to the more precise answer.

/// Well-known category names, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KnownCategory {
    Email,
    Url,
    UsPhone,
    FrPhone,
    UkPhone,
    Phone,
    UsSsn,
    Sedol,
    Iban,
    CreditCard,
    Ipv4Address,
    Uuid,
    FirstName,
    LastName,
    City,
    Country,
    UsState,
    Answer,
    Gender,
    Civility,
    Animal,
}

impl KnownCategory {
    /// Every known category in canonical order.
    pub const ALL: [KnownCategory; 21] = [
        KnownCategory::Email,
        KnownCategory::Url,
        KnownCategory::UsPhone,
        KnownCategory::FrPhone,
        KnownCategory::UkPhone,
        KnownCategory::Phone,
        KnownCategory::UsSsn,
        KnownCategory::Sedol,
        KnownCategory::Iban,
        KnownCategory::CreditCard,
        KnownCategory::Ipv4Address,
        KnownCategory::Uuid,
        KnownCategory::FirstName,
        KnownCategory::LastName,
        KnownCategory::City,
        KnownCategory::Country,
        KnownCategory::UsState,
        KnownCategory::Answer,
        KnownCategory::Gender,
        KnownCategory::Civility,
        KnownCategory::Animal,
    ];

    /// Category name as used in metadata.
    pub fn name(self) -> &'static str {
        match self {
            KnownCategory::Email => "EMAIL",
            KnownCategory::Url => "URL",
            KnownCategory::UsPhone => "US_PHONE",
            KnownCategory::FrPhone => "FR_PHONE",
            KnownCategory::UkPhone => "UK_PHONE",
            KnownCategory::Phone => "PHONE",
            KnownCategory::UsSsn => "US_SSN",
            KnownCategory::Sedol => "SEDOL",
            KnownCategory::Iban => "IBAN",
            KnownCategory::CreditCard => "CREDIT_CARD",
            KnownCategory::Ipv4Address => "IPV4_ADDRESS",
            KnownCategory::Uuid => "UUID",
            KnownCategory::FirstName => "FIRST_NAME",
            KnownCategory::LastName => "LAST_NAME",
            KnownCategory::City => "CITY",
            KnownCategory::Country => "COUNTRY",
            KnownCategory::UsState => "US_STATE",
            KnownCategory::Answer => "ANSWER",
            KnownCategory::Gender => "GENDER",
            KnownCategory::Civility => "CIVILITY",
            KnownCategory::Animal => "ANIMAL",
        }
    }

    /// Position in the canonical order.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Looks up a known category by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

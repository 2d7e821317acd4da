//! Zodiac sign classification.
//!
//! The ecliptic is divided into 12 equal signs of 30 degrees each, starting
//! from Aries at 0 deg. Given a longitude, we identify the sign index and
//! the position within that sign.

use gochara_core::normalize_360;

/// The 12 zodiac signs starting from Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All 12 signs in order (0 = Aries, 11 = Pisces).
pub const ALL_SIGNS: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

impl Sign {
    /// English name of the sign.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// 0-based index (Aries=0 .. Pisces=11).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Sign for a 0-based index, `None` if `index > 11`.
    pub fn from_index(index: u8) -> Option<Self> {
        ALL_SIGNS.get(index as usize).copied()
    }

    /// All 12 signs in order.
    pub const fn all() -> &'static [Sign; 12] {
        &ALL_SIGNS
    }
}

/// A longitude expressed as sign index plus degrees into that sign.
///
/// `sign_index * 30 + degree_in_sign` equals the normalized longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignPosition {
    /// 0-based sign index in [0, 11].
    pub sign_index: u8,
    /// Degrees within the sign in [0, 30).
    pub degree_in_sign: f64,
}

impl SignPosition {
    /// `None` for a hand-built position with `sign_index > 11`.
    pub fn sign(&self) -> Option<Sign> {
        Sign::from_index(self.sign_index)
    }
}

/// Classify a longitude (any real value, wrapped to [0, 360)).
pub fn sign_position(longitude_deg: f64) -> SignPosition {
    let lon = normalize_360(longitude_deg);
    let degree_in_sign = lon % 30.0;
    // lon - (lon % 30) is an exact multiple of 30, so rounding is safe.
    let sign_index = (((lon - degree_in_sign) / 30.0).round() as u8).min(11);
    SignPosition {
        sign_index,
        degree_in_sign,
    }
}

/// Sign index in [0, 11] for a longitude.
pub fn sign_index(longitude_deg: f64) -> u8 {
    sign_position(longitude_deg).sign_index
}

/// Degrees within the sign, in [0, 30).
pub fn degree_in_sign(longitude_deg: f64) -> f64 {
    sign_position(longitude_deg).degree_in_sign
}

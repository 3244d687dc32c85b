//! Macro for implementing Display and FromStr for configuration enums
//!
//! This macro eliminates boilerplate for enum conversions by providing a
//! single implementation for both Display and FromStr traits. It handles
//! case-insensitive parsing and consistent string representation, which is
//! what the environment-variable config loader relies on.
//!
//! # Example
//!
//! ```rust
//! use erpgate_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Mode {
//!     Fast,
//!     Safe,
//! }
//!
//! impl_domain_enum_conversions!(Mode {
//!     Fast => "fast",
//!     Safe => "safe",
//! });
//!
//! assert_eq!("SAFE".parse::<Mode>().unwrap(), Mode::Safe);
//! ```

/// Implements Display and FromStr traits for unit enums
///
/// This macro generates:
/// - Display trait: converts enum variants to lowercase strings
/// - FromStr trait: parses case-insensitive strings to enum variants
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

//! Macro for implementing string conversions on domain enums
//!
//! Log levels, log categories and timer types all travel as lowercase strings
//! (JSON payloads, config files, command arguments). This macro provides the
//! shared `as_str`, `Display`, `FromStr` and `ALL` plumbing in one place.
//!
//! # Example
//!
//! ```rust
//! use gymtrack_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Side {
//!     Left,
//!     Right,
//! }
//!
//! impl_domain_enum_conversions!(Side {
//!     Left => "left",
//!     Right => "right",
//! });
//!
//! assert_eq!(Side::Left.as_str(), "left");
//! assert_eq!("RIGHT".parse::<Side>(), Ok(Side::Right));
//! assert_eq!(Side::ALL.len(), 2);
//! ```

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for a fieldless enum
///
/// Parsing is case-insensitive; output is always the listed string.
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable string form of the variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

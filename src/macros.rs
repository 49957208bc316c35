//! Helper for one-byte enumerated codes

/// Define a `#[repr(u8)]` enum with strict `TryFrom<u8>` decoding
///
/// Out-of-range codes decode to `ProtocolError::InvalidValue` naming
/// the field given after the colon.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $field:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $name {
            /// Every defined code, in ascending order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire byte for this value
            pub fn code(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = $crate::error::ProtocolError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err($crate::error::ProtocolError::InvalidValue {
                        field: $field,
                        value,
                    }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }
    };
}

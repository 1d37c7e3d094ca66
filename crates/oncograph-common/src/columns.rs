//! Field enumerations.
//!
//! Each adapter describes the columns it understands as a closed enum whose
//! variants carry their source column name. `column_enum!` generates the
//! enum together with:
//! - `ALL`: every variant in declaration order (the canonical column order)
//! - `column()` / `from_column()`: the mapping to and from column names
//! - serde support, (de)serializing a variant as its column name so
//!   configuration files list plain column names.

#[doc(hidden)]
pub use serde as __serde;

#[macro_export]
macro_rules! column_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $column:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every field, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Source column name.
            pub fn column(&self) -> &'static str {
                match self {
                    $( $name::$variant => $column ),+
                }
            }

            pub fn from_column(column: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|f| f.column() == column)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.column())
            }
        }

        impl $crate::columns::__serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::columns::__serde::Serializer,
            {
                serializer.serialize_str(self.column())
            }
        }

        impl<'de> $crate::columns::__serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::columns::__serde::Deserializer<'de>,
            {
                let column = <::std::string::String as $crate::columns::__serde::Deserialize>::deserialize(deserializer)?;
                Self::from_column(&column).ok_or_else(|| {
                    <D::Error as $crate::columns::__serde::de::Error>::custom(format!(
                        "unknown {} column `{}`",
                        stringify!($name),
                        column
                    ))
                })
            }
        }
    };
}

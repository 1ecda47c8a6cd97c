/// Integer-coded enumerations.
///
/// Generates `from_value` (the coercion rule), `code`, and a `Deserialize`
/// impl for JSON members, all accepting the same numeric representations as
/// [`crate::coerce::integer`]. Codes without a named variant are kept as
/// `Other`; only values that aren't numbers at all are rejected.
macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A code with no named variant, as stored.
            Other(i64),
        }
        impl $name {
            pub fn from_value(value: &$crate::Value) -> ::std::result::Result<Self, $crate::coerce::Mismatch> {
                let code = $crate::coerce::integer(value)
                    .map_err(|_| $crate::coerce::Mismatch::new(stringify!($name), value))?;
                Ok(match code {
                    $( $code => Self::$variant, )+
                    other => Self::Other(other),
                })
            }

            /// The integer stored in the package.
            #[must_use]
            pub fn code(self) -> i64 {
                match self {
                    $( Self::$variant => $code, )+
                    Self::Other(code) => code,
                }
            }
        }
        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
                let value = <$crate::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::from_value(&value).map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    };
}

mod card;
mod collection;
mod config;
mod deck;
mod deck_config;
mod note;
mod notetype;
mod review;

pub use self::card::{Card, CardQueue, CardType};
pub use self::collection::Collection;
pub use self::config::Config;
pub use self::deck::{DayCount, Deck};
pub use self::deck_config::{DeckConfig, LapseConfig, LeechAction, NewCardOrder, NewConfig, ReviewConfig};
pub use self::note::{FieldValues, Note, Tags};
pub use self::notetype::{CardConstraint, Field, Model, ModelKind, Requirement, Template};
pub use self::review::{Review, ReviewEase, ReviewKind};

int_enum! {
    /// Discriminator of the `graves` tombstone table.
    pub enum GraveKind {
        Card = 0,
        Note = 1,
        Deck = 2,
    }
}

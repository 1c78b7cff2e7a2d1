//! Macros for declaring state universes.

/// Generate a [`State`](crate::core::State) implementation for a fieldless
/// enum.
///
/// Variant declaration order is the state order: it drives universe
/// iteration and rendering.
///
/// # Example
///
/// ```
/// use trackway::state_enum;
///
/// state_enum! {
///     pub enum RegistrationState {
///         Started,
///         Filled,
///         Validated,
///         Payed,
///         Finished,
///         Rejected,
///     }
/// }
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

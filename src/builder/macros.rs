//! Macros for declaring state domains.

/// Generate a state enum together with its `State` implementation.
///
/// The enum derives everything a dispatch key needs (`Clone`, `Copy`,
/// `PartialEq`, `Eq`, `Hash`, `Debug`). Each variant's name is its
/// identifier.
///
/// # Example
///
/// ```
/// use microstate::core::State;
/// use microstate::state_enum;
///
/// state_enum! {
///     pub enum Door {
///         Locked,
///         Unlocked,
///         Broken,
///     }
///     final: [Broken]
///     error: [Broken]
/// }
///
/// assert_eq!(Door::Unlocked.name(), "Unlocked");
/// assert!(Door::Broken.is_error());
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

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
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

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

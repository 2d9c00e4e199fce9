//! Macros for declaring state and trigger enums.

/// Generate a fieldless enum implementing [`State`](crate::core::State).
///
/// Each variant's name is its identifier.
///
/// # Example
///
/// ```
/// use strata::core::State;
/// use strata::state_enum;
///
/// state_enum! {
///     pub enum BugState {
///         Open,
///         Assigned,
///         Closed,
///     }
/// }
///
/// assert_eq!(BugState::Assigned.name(), "Assigned");
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
        }
    };
}

/// Generate a fieldless enum implementing [`Trigger`](crate::core::Trigger).
///
/// # Example
///
/// ```
/// use strata::core::Trigger;
/// use strata::trigger_enum;
///
/// trigger_enum! {
///     pub enum BugTrigger {
///         Assign,
///         Close,
///     }
/// }
///
/// assert_eq!(BugTrigger::Close.name(), "Close");
/// ```
#[macro_export]
macro_rules! trigger_enum {
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
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Trigger for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

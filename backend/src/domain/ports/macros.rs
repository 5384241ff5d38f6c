//! `define_port_error!`: thiserror enums for driven ports.
//!
//! Every variant carries named, optionally documented fields and gets a
//! snake_case constructor whose parameters accept `impl Into<FieldType>`,
//! so adapters can write `TimeSeriesError::timeout(err.to_string())` or
//! `ExplorationRepositoryError::not_found(id)`.

macro_rules! define_port_error {
    (@ctor $variant:ident ($($params:tt)*) ($($inits:tt)*)) => {
        ::paste::paste! {
            #[doc = concat!("Build a [`Self::", stringify!($variant), "`] error.")]
            #[must_use]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident {
                    $($(#[$field_meta:meta])* $field:ident : $ty:ty),+ $(,)?
                } => $message:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($(#[$field_meta])* $field : $ty),+ },
            )+
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant () () $($field : $ty,)+);
            )+
        }
    };
}

pub(crate) use define_port_error;

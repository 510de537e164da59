//! Declares adapter error enums together with their constructors.
//!
//! Each variant gets a snake-case constructor taking `impl Into<_>` for every
//! field, and the enum gets a `kind()` label for structured logs.

macro_rules! define_adapter_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($($($field: impl Into<$ty>),*)?) -> Self {
                        Self::$variant $( { $($field: $field.into()),* } )?
                    }
                )*

                /// Stable snake-case label of the variant.
                pub const fn kind(&self) -> &'static str {
                    match self {
                        $( Self::$variant { .. } => stringify!([<$variant:snake>]), )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_adapter_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_adapter_error! {
        pub enum SampleAdapterError {
            Unreachable { host: String } => "host unreachable: {host}",
            Rejected { status: u16, reason: String } => "rejected with {status}: {reason}",
            Aborted => "request aborted",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SampleAdapterError::unreachable("kc.internal");
        assert_eq!(err.to_string(), "host unreachable: kc.internal");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = SampleAdapterError::rejected(409_u16, "exists");
        assert_eq!(err.to_string(), "rejected with 409: exists");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SampleAdapterError::aborted(), SampleAdapterError::Aborted);
    }

    #[test]
    fn kinds_are_snake_case_variant_names() {
        assert_eq!(SampleAdapterError::unreachable("kc").kind(), "unreachable");
        assert_eq!(SampleAdapterError::aborted().kind(), "aborted");
    }
}

macro_rules! quantity {
    ($name:ident) => {
        #[repr(transparent)]
        #[derive(
            ::derive_more::Add,
            ::derive_more::AddAssign,
            ::derive_more::From,
            ::derive_more::FromStr,
            ::derive_more::Neg,
            ::derive_more::Sub,
            ::derive_more::SubAssign,
            ::derive_more::Sum,
            ::serde::Deserialize,
            ::serde::Serialize,
            ::std::clone::Clone,
            ::std::cmp::Eq,
            ::std::cmp::Ord,
            ::std::cmp::PartialEq,
            ::std::cmp::PartialOrd,
            ::std::default::Default,
            ::std::hash::Hash,
            ::std::marker::Copy,
        )]
        #[serde(transparent)]
        pub struct $name(pub ::rust_decimal::Decimal);

        #[allow(dead_code)]
        impl $name {
            pub const ZERO: Self = Self(::rust_decimal::Decimal::ZERO);

            /// Fixed-point value as stored in the database.
            pub fn from_millis(millis: i64) -> Self {
                Self(::rust_decimal::Decimal::new(millis, $crate::quantity::STORED_DECIMALS))
            }

            /// Convert to the stored fixed-point representation, rounding half to even.
            pub fn to_millis(self) -> $crate::prelude::Result<i64> {
                use ::anyhow::Context as _;
                use ::rust_decimal::prelude::ToPrimitive as _;

                (self.0.round_dp($crate::quantity::STORED_DECIMALS) * ::rust_decimal::Decimal::ONE_THOUSAND)
                    .to_i64()
                    .with_context(|| format!("`{}` does not fit into the storage", self.0))
            }

            /// Same value with the trailing zeros stripped, so that equal values print alike.
            pub fn normalize(self) -> Self {
                Self(self.0.normalize())
            }

            #[must_use]
            pub fn is_sign_negative(self) -> bool {
                self.0.is_sign_negative() && !self.0.is_zero()
            }
        }

        impl ::std::ops::Mul<::rust_decimal::Decimal> for $name {
            type Output = Self;

            fn mul(self, rhs: ::rust_decimal::Decimal) -> Self::Output {
                Self(self.0 * rhs)
            }
        }
    };

    ($name:ident, $unit:literal) => {
        quantity!($name);

        impl ::std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0.normalize(), formatter)?;
                write!(formatter, " {}", $unit)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0.normalize(), formatter)?;
                write!(formatter, "{}", $unit)
            }
        }
    };
}

//! Macros for defining kind enums.

/// Macro for defining a closed kind enum with a stable wire representation.
///
/// Every variant is bound to the exact string the remote services use for
/// it. Parsing is ASCII case-insensitive, while formatting and serialization
/// always produce the declared string.
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
///
/// define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube"]
///         Cube = "CUBE",
///
///         #[doc = "A sphere"]
///         Sphere = "SPHERE",
///     }
/// }
///
/// assert_eq!(Kind::Cube.to_string(), "CUBE");
/// assert_eq!("sphere".parse::<Kind>().unwrap(), Kind::Sphere);
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $wire:literal
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[doc = $doc]
        #[strum(ascii_case_insensitive)]
        pub enum $name {
            $(
                #[doc = $variant_doc]
                #[strum(serialize = $wire)]
                $variant,
            )*
        }

        impl $name {
            /// All the variants, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the wire representation of this value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)*
                }
            }
        }

        impl $crate::private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::private::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::private::serde::Deserializer<'de>,
            {
                use $crate::private::serde::de::Error as _;

                let raw = <::std::string::String as
                    $crate::private::serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                raw.parse().map_err(|_| {
                    D::Error::unknown_variant(&raw, &[$($wire),*])
                })
            }
        }
    };
}

#[cfg(test)]
mod spec {
    crate::define_kind! {
        #[doc = "Test kind."]
        enum Light {
            #[doc = "Red light."]
            Red = "RED",

            #[doc = "Green light."]
            Green = "GreenLight",
        }
    }

    #[test]
    fn formats_wire_string() {
        assert_eq!(Light::Red.to_string(), "RED");
        assert_eq!(Light::Green.as_str(), "GreenLight");
        assert_eq!(Light::ALL, &[Light::Red, Light::Green]);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("red".parse::<Light>().unwrap(), Light::Red);
        assert_eq!("GREENLIGHT".parse::<Light>().unwrap(), Light::Green);
        assert!("blue".parse::<Light>().is_err());
    }

    #[test]
    fn serde_uses_wire_string() {
        assert_eq!(
            serde_json::to_string(&Light::Green).unwrap(),
            r#""GreenLight""#,
        );
        assert_eq!(
            serde_json::from_str::<Light>(r#""Red""#).unwrap(),
            Light::Red,
        );
        assert!(serde_json::from_str::<Light>(r#""Amber""#).is_err());
    }
}

/// Declares a platform integer constant set as an enum. Unknown values are
/// kept in an `Other` variant so they round-trip through the bridge intact.
macro_rules! platform_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )*
            Other(i32),
        }

        impl $name {
            pub fn from_raw(raw: i32) -> Self {
                match raw {
                    $( v if v == $value => Self::$variant, )*
                    other => Self::Other(other),
                }
            }

            pub fn raw(self) -> i32 {
                match self {
                    $( Self::$variant => $value, )*
                    Self::Other(v) => v,
                }
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self::from_raw(raw)
            }
        }
    };
}

/// Declares a closed set of values stored as TEXT, with matching serde,
/// sqlx and `FromStr` spellings.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            sqlx::Type,
            utoipa::ToSchema,
        )]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                #[sqlx(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::Error;

            fn from_str(s: &str) -> crate::error::Result<Self> {
                let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
                match normalized.as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(crate::error::Error::BadRequest(format!(
                        "Unknown {} value: {}",
                        stringify!($name),
                        s
                    ))),
                }
            }
        }
    };
}

pub mod application;
pub mod audit_event;
pub mod calendar_event;
pub mod class_instance;
pub mod faculty;
pub mod hackathon;
pub mod note;
pub mod priority;
pub mod project;
pub mod subject;
pub mod task;
pub mod timetable;

//! Opaque host identifiers.
//!
//! The host names meshes, vertices, skin bindings and influences with
//! strings. None of them carry meaning here beyond equality and display.

use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Name of a mesh in the host scene.
    MeshId
);
string_id!(
    /// Handle of a single vertex, e.g. `hair.vtx[12]`.
    VertexId
);
string_id!(
    /// Name of the skin binding (skin cluster) attached to a mesh.
    BindingId
);
string_id!(
    /// Name of an influence (usually a joint) within a skin binding.
    InfluenceId
);
